// Evaluation Results
// Rows handed to the presentation layer after each classification run

use crate::{MarketPhase, SignalGrade, ThresholdSet};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classification of one symbol in one evaluation cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub symbol: String,
    /// Last observed underlying price, when the provider had one
    pub price: Option<Decimal>,
    pub phase: MarketPhase,
    pub grade: SignalGrade,
    pub stock_reason: String,
    pub option_reason: String,
    /// Display form of the ATM contract that was checked, if any
    pub atm_summary: Option<String>,
    pub final_reason: String,
    pub evaluated_at: DateTime<Utc>,
}

/// One full scan over a watchlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub run_id: Uuid,
    pub phase: MarketPhase,
    /// Threshold snapshot every row in this report was judged under
    pub thresholds: ThresholdSet,
    /// Rows sorted by grade, best first
    pub rows: Vec<Evaluation>,
    pub a_count: usize,
    pub c_count: usize,
    pub block_count: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
