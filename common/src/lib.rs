// Shared Domain Types
// Data model used by the market data layer and the signal engine

pub mod market;
pub mod report;
pub mod signal;

pub use market::{Bar, ChainExpiry, OptionChain, OptionContract};
pub use report::{Evaluation, ScanReport};
pub use signal::{DecisionInput, GateOutcome, MarketPhase, SignalGrade, ThresholdSet};
