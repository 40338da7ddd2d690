// Signal Engine
// End-to-end evaluation of one symbol and the batch scan over a watchlist

use crate::config::EngineConfig;
use crate::liveness::LivenessRadar;
use crate::phase::PhaseClock;
use crate::rating::rate;
use crate::structure::StructureGate;
use chrono::{DateTime, Utc};
use common::{
    Bar, DecisionInput, Evaluation, GateOutcome, MarketPhase, OptionChain, ScanReport,
    SignalGrade, ThresholdSet,
};
use market_data::{atm_call, MarketDataProvider};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One watchlist entry: the symbol plus its externally supplied verdict
#[derive(Debug, Clone)]
pub struct WatchItem {
    pub symbol: String,
    pub decision: DecisionInput,
}

impl WatchItem {
    pub fn new(symbol: &str, decision: DecisionInput) -> Self {
        Self {
            symbol: symbol.to_string(),
            decision,
        }
    }
}

/// Market-phase-aware classification over a market data provider
///
/// Owns the long-lived liveness radar: construct one engine per process and
/// reuse it across scan cycles so per-contract quote history accumulates.
pub struct SignalEngine {
    provider: Arc<dyn MarketDataProvider>,
    clock: PhaseClock,
    structure: StructureGate,
    radar: LivenessRadar,
    config: EngineConfig,
}

impl SignalEngine {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: EngineConfig) -> Self {
        Self {
            provider,
            clock: PhaseClock::new(),
            structure: StructureGate::new(config.structure.clone()),
            radar: LivenessRadar::new(config.liveness.clone()),
            config,
        }
    }

    pub fn radar(&self) -> &LivenessRadar {
        &self.radar
    }

    /// Classify one symbol at the given instant
    pub async fn evaluate(
        &self,
        symbol: &str,
        now: DateTime<Utc>,
        decision: DecisionInput,
    ) -> Evaluation {
        let (phase, thresholds) = self.clock.current_phase(now);
        self.evaluate_under(symbol, phase, &thresholds, decision)
            .await
    }

    /// Classify one symbol under an already-resolved threshold snapshot
    ///
    /// Batch scans resolve the snapshot once and reuse it for every symbol,
    /// so a whole cycle is judged under identical thresholds.
    pub async fn evaluate_under(
        &self,
        symbol: &str,
        phase: MarketPhase,
        thresholds: &ThresholdSet,
        decision: DecisionInput,
    ) -> Evaluation {
        let bars = self.fetch_bars(symbol).await;
        let verdict = self
            .structure
            .evaluate(bars.as_deref().unwrap_or(&[]), decision);
        let price = self.fetch_price(symbol).await;

        let mut atm_summary = None;
        let option_outcome = if !verdict.outcome.passed {
            // A structural reject never needs a derivative quote, so the
            // chain is not even fetched
            GateOutcome::fail("not evaluated")
        } else {
            match (price, self.fetch_chain(symbol).await) {
                (Some(spot), Some(chain)) => match atm_call(&chain, spot) {
                    Some(atm) => {
                        atm_summary = Some(atm.summary());
                        let stock_move = bars.as_deref().map_or(0.0, observed_move);
                        self.radar.check(atm, stock_move, thresholds)
                    }
                    None => GateOutcome::fail("no call contracts"),
                },
                (None, _) => GateOutcome::fail("no underlying price"),
                (_, None) => GateOutcome::fail("no option chain"),
            }
        };

        let (grade, final_reason) = rate(&verdict.outcome, &option_outcome);
        debug!(
            "{}: grade={} tier={} ({})",
            symbol,
            grade,
            verdict.tier.label(),
            final_reason
        );

        Evaluation {
            symbol: symbol.to_string(),
            price,
            phase,
            grade,
            stock_reason: verdict.outcome.reason,
            option_reason: option_outcome.reason,
            atm_summary,
            final_reason,
            evaluated_at: Utc::now(),
        }
    }

    /// Evaluate a whole watchlist under one threshold snapshot
    ///
    /// Symbols are independent; they run concurrently up to the configured
    /// width, with a small per-symbol throttle to keep the provider happy.
    pub async fn scan(&self, watchlist: &[WatchItem], now: DateTime<Utc>) -> ScanReport {
        let started_at = Utc::now();
        let (phase, thresholds) = self.clock.current_phase(now);
        info!(
            "scan start: {} symbols, phase={} spread_limit={} stock_move_threshold={} strict={}",
            watchlist.len(),
            phase,
            thresholds.spread_limit,
            thresholds.stock_move_threshold,
            thresholds.strict
        );

        let limit = Arc::new(Semaphore::new(self.config.scan.max_concurrent.max(1)));
        let throttle = Duration::from_millis(self.config.scan.throttle_ms);
        let mut rows = futures::future::join_all(watchlist.iter().map(|item| {
            let limit = Arc::clone(&limit);
            async move {
                let _permit = limit.acquire().await.expect("scan semaphore closed");
                if !throttle.is_zero() {
                    tokio::time::sleep(throttle).await;
                }
                self.evaluate_under(&item.symbol, phase, &thresholds, item.decision)
                    .await
            }
        }))
        .await;

        rows.sort_by(|a, b| b.grade.cmp(&a.grade).then_with(|| a.symbol.cmp(&b.symbol)));
        let a_count = rows.iter().filter(|r| r.grade == SignalGrade::A).count();
        let c_count = rows.iter().filter(|r| r.grade == SignalGrade::C).count();
        let block_count = rows
            .iter()
            .filter(|r| r.grade == SignalGrade::Block)
            .count();
        info!(
            "scan done: {} A / {} C / {} BLOCK",
            a_count, c_count, block_count
        );

        ScanReport {
            run_id: Uuid::new_v4(),
            phase,
            thresholds,
            rows,
            a_count,
            c_count,
            block_count,
            started_at,
            finished_at: Utc::now(),
        }
    }

    async fn fetch_bars(&self, symbol: &str) -> Option<Vec<Bar>> {
        match self.provider.bars(symbol).await {
            Ok(bars) => bars,
            Err(e) => {
                warn!("bars unavailable for {}: {:#}", symbol, e);
                None
            }
        }
    }

    async fn fetch_price(&self, symbol: &str) -> Option<Decimal> {
        match self.provider.price(symbol).await {
            Ok(price) => price,
            Err(e) => {
                warn!("price unavailable for {}: {:#}", symbol, e);
                None
            }
        }
    }

    async fn fetch_chain(&self, symbol: &str) -> Option<OptionChain> {
        match self.provider.option_chain(symbol).await {
            Ok(chain) => chain,
            Err(e) => {
                warn!("option chain unavailable for {}: {:#}", symbol, e);
                None
            }
        }
    }
}

/// Move of the underlying across the last two closes, as a fraction
fn observed_move(bars: &[Bar]) -> f64 {
    let n = bars.len();
    if n < 2 {
        return 0.0;
    }
    let prev = bars[n - 2].close;
    if prev == 0.0 {
        return 0.0;
    }
    (bars[n - 1].close - prev) / prev
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone};
    use chrono_tz::America::New_York;
    use common::{ChainExpiry, OptionContract};
    use market_data::StaticProvider;
    use rust_decimal_macros::dec;

    fn bars_from_closes(closes: &[f64], half_range: f64) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2026, 8, 5, 14, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: start + ChronoDuration::minutes(i as i64 * 5),
                high: close + half_range,
                low: close - half_range,
                close,
            })
            .collect()
    }

    fn trending_bars() -> Vec<Bar> {
        let closes: Vec<f64> = (0..40).map(|i| 81.0 + i as f64).collect();
        bars_from_closes(&closes, 1.0)
    }

    fn choppy_bars() -> Vec<Bar> {
        let closes: Vec<f64> = (0..16)
            .map(|i| if i % 2 == 0 { 99.8 } else { 100.2 })
            .collect();
        bars_from_closes(&closes, 0.5)
    }

    fn chain(bid: Decimal, ask: Decimal) -> OptionChain {
        OptionChain {
            expirations: vec![ChainExpiry {
                expiry: NaiveDate::from_ymd_opt(2026, 8, 21).unwrap(),
                calls: vec![
                    OptionContract {
                        contract_id: "UP260821C00120000".to_string(),
                        strike: dec!(120),
                        bid,
                        ask,
                        last_price: bid,
                        volume: 40,
                    },
                    OptionContract {
                        contract_id: "UP260821C00125000".to_string(),
                        strike: dec!(125),
                        bid: dec!(0.40),
                        ask: dec!(0.48),
                        last_price: dec!(0.44),
                        volume: 12,
                    },
                ],
            }],
        }
    }

    fn midday() -> DateTime<Utc> {
        New_York
            .with_ymd_and_hms(2026, 8, 5, 13, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn repeated_evaluations_graduate_to_grade_a() {
        let provider = Arc::new(
            StaticProvider::new()
                .with_price("UP", dec!(120.5))
                .with_bars("UP", trending_bars())
                .with_chain_sequence(
                    "UP",
                    vec![
                        chain(dec!(0.95), dec!(1.05)),
                        chain(dec!(0.97), dec!(1.07)),
                        chain(dec!(1.00), dec!(1.10)),
                    ],
                ),
        );
        let engine = SignalEngine::new(provider, EngineConfig::default());
        let now = midday();

        // One observation cannot prove a live quote yet
        let first = engine.evaluate("UP", now, DecisionInput::Approve).await;
        assert_eq!(first.grade, SignalGrade::C);
        assert!(first.option_reason.contains("ambiguous momentum"));

        let second = engine.evaluate("UP", now, DecisionInput::Approve).await;
        assert_eq!(second.grade, SignalGrade::A);

        let third = engine.evaluate("UP", now, DecisionInput::Approve).await;
        assert_eq!(third.grade, SignalGrade::A);
        assert_eq!(third.phase, MarketPhase::MidDay);
        assert!(third.stock_reason.contains("bullish"));
        assert!(third.option_reason.contains("quote active"));
        assert!(third.final_reason.contains("trade qualified"));
        assert!(third
            .atm_summary
            .as_deref()
            .unwrap()
            .contains("UP260821C00120000"));
        assert_eq!(engine.radar().tracked_contracts(), 1);
    }

    #[tokio::test]
    async fn structural_reject_blocks_and_skips_the_chain() {
        let provider = Arc::new(
            StaticProvider::new()
                .with_price("CHOP", dec!(100.0))
                .with_bars("CHOP", choppy_bars())
                .with_chain_sequence(
                    "CHOP",
                    vec![chain(dec!(0.95), dec!(1.05)), chain(dec!(0.97), dec!(1.07))],
                ),
        );
        let engine = SignalEngine::new(provider.clone(), EngineConfig::default());

        let row = engine
            .evaluate("CHOP", midday(), DecisionInput::Approve)
            .await;
        assert_eq!(row.grade, SignalGrade::Block);
        assert!(row.stock_reason.contains("Barb Wire"));
        assert_eq!(row.option_reason, "not evaluated");
        assert!(row.atm_summary.is_none());
        assert_eq!(engine.radar().tracked_contracts(), 0);

        // The chain queue was never polled
        let untouched = provider.option_chain("CHOP").await.unwrap().unwrap();
        assert_eq!(untouched.expirations[0].calls[0].bid, dec!(0.95));
    }

    #[tokio::test]
    async fn missing_bars_degrade_to_insufficient_data() {
        let provider = Arc::new(StaticProvider::new());
        let engine = SignalEngine::new(provider, EngineConfig::default());
        let row = engine
            .evaluate("GHOST", midday(), DecisionInput::Approve)
            .await;
        assert_eq!(row.grade, SignalGrade::Block);
        assert_eq!(row.stock_reason, "insufficient data");
        assert!(row.price.is_none());
    }

    #[tokio::test]
    async fn vetoed_decision_blocks_a_clean_setup() {
        let provider = Arc::new(
            StaticProvider::new()
                .with_price("UP", dec!(120.5))
                .with_bars("UP", trending_bars()),
        );
        let engine = SignalEngine::new(provider, EngineConfig::default());
        let row = engine.evaluate("UP", midday(), DecisionInput::Veto).await;
        assert_eq!(row.grade, SignalGrade::Block);
        assert_eq!(row.stock_reason, "decision vetoed");
    }

    #[tokio::test]
    async fn structural_pass_without_a_chain_is_on_hold() {
        let provider = Arc::new(
            StaticProvider::new()
                .with_price("BARE", dec!(120.5))
                .with_bars("BARE", trending_bars()),
        );
        let engine = SignalEngine::new(provider, EngineConfig::default());
        let row = engine
            .evaluate("BARE", midday(), DecisionInput::Approve)
            .await;
        assert_eq!(row.grade, SignalGrade::C);
        assert_eq!(row.option_reason, "no option chain");
        assert!(row.final_reason.contains("option on hold"));
    }

    #[tokio::test]
    async fn scan_sorts_rows_and_counts_grades() {
        let provider = Arc::new(
            StaticProvider::new()
                .with_price("UP", dec!(120.5))
                .with_bars("UP", trending_bars())
                .with_chain_sequence(
                    "UP",
                    vec![chain(dec!(0.95), dec!(1.05)), chain(dec!(0.97), dec!(1.07))],
                )
                .with_price("CHOP", dec!(100.0))
                .with_bars("CHOP", choppy_bars())
                .with_price("BARE", dec!(120.5))
                .with_bars("BARE", trending_bars()),
        );
        let engine = SignalEngine::new(provider, EngineConfig::default());
        let watchlist = vec![
            WatchItem::new("CHOP", DecisionInput::Approve),
            WatchItem::new("UP", DecisionInput::Approve),
            WatchItem::new("BARE", DecisionInput::Approve),
        ];

        // First cycle seeds quote history; the second can prove liveness
        engine.scan(&watchlist, midday()).await;
        let report = engine.scan(&watchlist, midday()).await;

        assert_eq!(report.phase, MarketPhase::MidDay);
        assert_eq!(report.a_count, 1);
        assert_eq!(report.c_count, 1);
        assert_eq!(report.block_count, 1);
        let symbols: Vec<&str> = report.rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["UP", "BARE", "CHOP"]);
    }

    #[tokio::test]
    async fn closed_session_never_rates_a() {
        let provider = Arc::new(
            StaticProvider::new()
                .with_price("UP", dec!(120.5))
                .with_bars("UP", trending_bars())
                .with_chain("UP", chain(dec!(0.95), dec!(1.05))),
        );
        let engine = SignalEngine::new(provider, EngineConfig::default());
        let night = New_York
            .with_ymd_and_hms(2026, 8, 5, 22, 0, 0)
            .unwrap()
            .with_timezone(&Utc);

        let report = engine
            .scan(&[WatchItem::new("UP", DecisionInput::Approve)], night)
            .await;
        assert_eq!(report.phase, MarketPhase::Closed);
        assert_eq!(report.a_count, 0);
        assert!(report.rows[0].option_reason.contains("spread too wide"));
    }
}
