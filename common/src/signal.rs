// Signal Classification Types
// Phases, thresholds, gate outcomes and the final grade

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trading phase of the exchange session, derived purely from time-of-day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketPhase {
    PreMarket,
    OpeningDrive,
    MidDay,
    PostMarket,
    Closed,
}

impl fmt::Display for MarketPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarketPhase::PreMarket => "PRE_MARKET",
            MarketPhase::OpeningDrive => "OPENING_DRIVE",
            MarketPhase::MidDay => "MID_DAY",
            MarketPhase::PostMarket => "POST_MARKET",
            MarketPhase::Closed => "CLOSED",
        };
        write!(f, "{}", name)
    }
}

/// Gate thresholds active during one phase
///
/// `stock_move_threshold` and `strict` travel with the snapshot for logging
/// and display; the gates branch on `spread_limit` only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// Minimum underlying move of interest, as a fraction (0.005 = 0.5%)
    pub stock_move_threshold: f64,
    /// Maximum acceptable relative spread; zero rejects every quote
    pub spread_limit: Decimal,
    pub strict: bool,
}

/// Outcome of one gate check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOutcome {
    pub passed: bool,
    pub reason: String,
}

impl GateOutcome {
    pub fn pass(reason: impl Into<String>) -> Self {
        Self {
            passed: true,
            reason: reason.into(),
        }
    }

    /// A rejection always carries a non-empty human-readable reason
    pub fn fail(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        debug_assert!(!reason.is_empty(), "gate rejection without a reason");
        Self {
            passed: false,
            reason,
        }
    }
}

/// Final actionability tier
///
/// The ordering (A > C > Block) exists for ranking result tables; it carries
/// no meaning beyond presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SignalGrade {
    Block,
    C,
    A,
}

impl SignalGrade {
    /// Sort key used by scan reports, higher ranks first
    pub fn score(&self) -> u8 {
        match self {
            SignalGrade::A => 3,
            SignalGrade::C => 2,
            SignalGrade::Block => 1,
        }
    }
}

impl fmt::Display for SignalGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalGrade::A => "A",
            SignalGrade::C => "C",
            SignalGrade::Block => "BLOCK",
        };
        write!(f, "{}", name)
    }
}

/// Externally computed verdict consumed by the structural gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionInput {
    Approve,
    Veto,
    /// The external decision source produced no verdict this cycle
    Unavailable,
}

impl DecisionInput {
    /// Only an explicit approval clears the decision gate
    pub fn approved(&self) -> bool {
        matches!(self, DecisionInput::Approve)
    }
}
