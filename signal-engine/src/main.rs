// Scanner Demo
// Runs a few dual-gate scan cycles over a fixture watchlist and logs the
// graded table

use anyhow::Result;
use chrono::{Duration, Utc};
use common::{Bar, DecisionInput};
use market_data::{chain_from_json, StaticProvider};
use rust_decimal_macros::dec;
use signal_engine::{EngineConfig, SignalEngine, WatchItem};
use std::sync::Arc;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_toml(&std::fs::read_to_string(&path)?)?,
        None => EngineConfig::default(),
    };

    info!("🚀 Starting dual-gate scanner demo");
    let provider = Arc::new(demo_provider()?);
    let engine = SignalEngine::new(provider, config);

    let watchlist = vec![
        WatchItem::new("NVDA", DecisionInput::Approve),
        WatchItem::new("TSLA", DecisionInput::Approve),
        WatchItem::new("AMD", DecisionInput::Veto),
    ];

    // A few cycles so the radar can accumulate per-contract quote history
    for cycle in 1..=3 {
        let report = engine.scan(&watchlist, Utc::now()).await;
        info!(
            "cycle {}: phase={} {} A / {} C / {} BLOCK",
            cycle, report.phase, report.a_count, report.c_count, report.block_count
        );
        for row in &report.rows {
            info!(
                "  {:<6} {:<5} stock: {} | option: {} | atm: {}",
                row.symbol,
                row.grade.to_string(),
                row.stock_reason,
                row.option_reason,
                row.atm_summary.as_deref().unwrap_or("-")
            );
        }
    }
    info!(
        "👋 Done; {} contracts tracked",
        engine.radar().tracked_contracts()
    );

    Ok(())
}

/// Fixture data: one clean uptrend with a live chain, one choppy tape and
/// one vetoed symbol
fn demo_provider() -> Result<StaticProvider> {
    let nvda_chains = vec![
        chain_from_json(&chain_payload(0.95, 1.05))?,
        chain_from_json(&chain_payload(0.97, 1.07))?,
        chain_from_json(&chain_payload(1.00, 1.10))?,
    ];

    Ok(StaticProvider::new()
        .with_price("NVDA", dec!(120.5))
        .with_bars("NVDA", rising_bars())
        .with_chain_sequence("NVDA", nvda_chains)
        .with_price("TSLA", dec!(100.0))
        .with_bars("TSLA", choppy_bars())
        .with_price("AMD", dec!(120.5))
        .with_bars("AMD", rising_bars()))
}

fn chain_payload(bid: f64, ask: f64) -> String {
    format!(
        r#"{{
            "expirations": [{{
                "expiry": "2026-08-21",
                "calls": [
                    {{"contractSymbol": "NVDA260821C00120000", "strike": 120.0, "bid": {}, "ask": {}, "lastPrice": {}, "volume": 310}},
                    {{"contractSymbol": "NVDA260821C00125000", "strike": 125.0, "bid": 0.62, "ask": 0.70, "lastPrice": 0.66, "volume": 120}}
                ]
            }}]
        }}"#,
        bid, ask, bid
    )
}

fn bars_from_closes(closes: &[f64], half_range: f64) -> Vec<Bar> {
    let start = Utc::now() - Duration::minutes(closes.len() as i64 * 5);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            timestamp: start + Duration::minutes(i as i64 * 5),
            high: close + half_range,
            low: close - half_range,
            close,
        })
        .collect()
}

fn rising_bars() -> Vec<Bar> {
    let closes: Vec<f64> = (0..40).map(|i| 81.0 + i as f64).collect();
    bars_from_closes(&closes, 1.0)
}

fn choppy_bars() -> Vec<Bar> {
    let closes: Vec<f64> = (0..16)
        .map(|i| if i % 2 == 0 { 99.8 } else { 100.2 })
        .collect();
    bars_from_closes(&closes, 0.5)
}
