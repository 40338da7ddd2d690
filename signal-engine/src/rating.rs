// Rating Combiner
// Fuses the structural and liveness outcomes into the final tier

use common::{GateOutcome, SignalGrade};

/// Pure decision table, evaluated in order: a structural failure blocks
/// outright, both gates passing rates A, a live stock with a dead option
/// rates C. The option gate is never consulted when the stock gate fails.
pub fn rate(stock: &GateOutcome, option: &GateOutcome) -> (SignalGrade, String) {
    if !stock.passed {
        return (SignalGrade::Block, stock.reason.clone());
    }
    if option.passed {
        (
            SignalGrade::A,
            format!("trade qualified (stock ok + option ok: {})", option.reason),
        )
    } else {
        (
            SignalGrade::C,
            format!("option on hold (stock ok, but {})", option.reason),
        )
    }
}
