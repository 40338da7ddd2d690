// ATM Selection
// Nearest-strike call on the front expiry

use common::{OptionChain, OptionContract};
use rust_decimal::Decimal;

/// Pick the at-the-money call: the front-expiry contract whose strike is
/// closest to the current underlying price
pub fn atm_call(chain: &OptionChain, spot: Decimal) -> Option<&OptionContract> {
    let front = chain.front_expiry()?;
    front.calls.iter().min_by_key(|c| (c.strike - spot).abs())
}
