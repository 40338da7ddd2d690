// Structural Gate
// Volatility, trend and range-position rules over the underlying's bars

use crate::config::StructureConfig;
use crate::indicators::{average_true_range, coefficient_of_variation, ema, range_position};
use common::{Bar, DecisionInput, GateOutcome};
use tracing::debug;

/// Display tier attached to a structural verdict; never branched on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureTier {
    Setup,
    Rejected,
}

impl StructureTier {
    pub fn label(&self) -> &'static str {
        match self {
            StructureTier::Setup => "B",
            StructureTier::Rejected => "F",
        }
    }
}

/// Structural gate result: the gate outcome plus a display-only tier
#[derive(Debug, Clone, PartialEq)]
pub struct StructureVerdict {
    pub outcome: GateOutcome,
    pub tier: StructureTier,
}

impl StructureVerdict {
    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            outcome: GateOutcome::fail(reason),
            tier: StructureTier::Rejected,
        }
    }
}

/// Evaluates an instrument's bar series against the structural rule ladder
///
/// Rules short-circuit in a fixed order; the first failing rule names the
/// rejection.
#[derive(Debug, Clone, Default)]
pub struct StructureGate {
    config: StructureConfig,
}

impl StructureGate {
    pub fn new(config: StructureConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(&self, bars: &[Bar], decision: DecisionInput) -> StructureVerdict {
        let cfg = &self.config;
        if bars.len() < cfg.min_bars {
            return StructureVerdict::rejected("insufficient data");
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let last_close = closes[closes.len() - 1];

        let atr = average_true_range(bars);
        let atr_pct = atr / last_close;

        let ema_fast = ema(&closes, cfg.ema_fast_span);
        let ema_slow = ema(&closes, cfg.ema_slow_span);
        let trend = if last_close > ema_fast {
            "bullish"
        } else {
            "bearish"
        };
        let trend_strong = (last_close > ema_fast && ema_fast > ema_slow)
            || (last_close < ema_fast && ema_fast < ema_slow);

        let Some(position) = range_position(bars) else {
            return StructureVerdict::rejected("degenerate range");
        };

        let window = &closes[closes.len().saturating_sub(cfg.choppiness_window)..];
        let cv = coefficient_of_variation(window);

        debug!(
            "structure metrics: atr_pct={:.5} position={:.3} cv={:.4} trend={} strong={}",
            atr_pct, position, cv, trend, trend_strong
        );

        if cv < cfg.choppiness_floor {
            return StructureVerdict::rejected(format!("Barb Wire (cv={:.4})", cv));
        }

        if position >= cfg.mid_band_low && position <= cfg.mid_band_high {
            let hugging_ema = (last_close - ema_fast).abs() / last_close < cfg.ema_tolerance;
            if !(trend_strong && hugging_ema) {
                return StructureVerdict::rejected(format!("mid-range ({:.0}%)", position * 100.0));
            }
        }

        if !decision.approved() {
            return StructureVerdict::rejected("decision vetoed");
        }

        if atr_pct < cfg.atr_floor {
            return StructureVerdict::rejected(format!("low volatility (ATR%={:.3})", atr_pct));
        }

        StructureVerdict {
            outcome: GateOutcome::pass(format!("structure confirmed ({})", trend)),
            tier: StructureTier::Setup,
        }
    }
}
