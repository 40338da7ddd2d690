// Liveness Radar
// Per-contract quote history and the anti-spoofing checks over it

use crate::config::LivenessConfig;
use common::{GateOutcome, OptionContract, ThresholdSet};
use dashmap::DashMap;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Tracks observed mid-prices per contract and judges quote liveness
///
/// One radar instance must live as long as the watchlist is tracked: the
/// staleness and distinct-count rules only see anything once history has
/// accumulated across scan cycles. Histories are keyed by contract_id and
/// sharded by the map, so polls of the same contract serialize while polls
/// of different contracts never contend.
pub struct LivenessRadar {
    config: LivenessConfig,
    history: DashMap<String, VecDeque<Decimal>>,
}

impl Default for LivenessRadar {
    fn default() -> Self {
        Self::new(LivenessConfig::default())
    }
}

impl LivenessRadar {
    pub fn new(config: LivenessConfig) -> Self {
        Self {
            config,
            history: DashMap::new(),
        }
    }

    /// Number of contracts currently tracked
    pub fn tracked_contracts(&self) -> usize {
        self.history.len()
    }

    /// Judge one freshly observed quote
    ///
    /// Appends the quote's mid to the contract's bounded history (invalid
    /// quotes never touch history), then evaluates the rejection ladder in
    /// order: stalled feed, spread limit, momentum divergence, and finally
    /// the distinct-mid liveness bar. A single tight quote proves nothing;
    /// only a mid that keeps moving does.
    pub fn check(
        &self,
        contract: &OptionContract,
        stock_move_pct: f64,
        thresholds: &ThresholdSet,
    ) -> GateOutcome {
        let Some(mid) = contract.mid() else {
            return GateOutcome::fail("invalid quote");
        };
        let spread = (contract.ask - contract.bid) / mid;

        let mut entry = self
            .history
            .entry(contract.contract_id.clone())
            .or_default();
        let history = entry.value_mut();
        history.push_back(mid);
        while history.len() > self.config.history_capacity {
            history.pop_front();
        }

        debug!(
            "radar {}: mid={} spread={:.4} history_len={}",
            contract.contract_id,
            mid,
            as_f64(spread),
            history.len()
        );

        let n = history.len();
        if n >= 3 && history[n - 1] == history[n - 2] && history[n - 2] == history[n - 3] {
            return GateOutcome::fail("quote stalled");
        }

        if spread > thresholds.spread_limit {
            return GateOutcome::fail(format!(
                "spread too wide ({:.1}% > {:.1}%)",
                as_f64(spread) * 100.0,
                as_f64(thresholds.spread_limit) * 100.0
            ));
        }

        if n >= 2 {
            let prev = history[n - 2];
            let mid_change = (mid - prev) / prev;
            if stock_move_pct > 0.0 && mid_change < -self.config.divergence_drop {
                return GateOutcome::fail("momentum divergence");
            }
        }

        let distinct: HashSet<Decimal> = history.iter().copied().collect();
        let alive = if n < 3 {
            distinct.len() >= 2
        } else {
            distinct.len() >= 3
        };

        if alive {
            GateOutcome::pass(format!("quote active (spread {:.1}%)", as_f64(spread) * 100.0))
        } else {
            GateOutcome::fail(format!(
                "ambiguous momentum (spread {:.1}%)",
                as_f64(spread) * 100.0
            ))
        }
    }
}

fn as_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
