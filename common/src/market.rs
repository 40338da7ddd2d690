// Market Observations
// Bars and option chain snapshots as supplied by the market data provider

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One OHLC bar of the underlying instrument
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// A single option contract quote
///
/// A bid or ask of zero means "no quote", not a real zero price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Unique per strike + expiry + type; stable across polls within a
    /// trading day, otherwise quote-history tracking is meaningless
    pub contract_id: String,
    pub strike: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
    pub last_price: Decimal,
    pub volume: u64,
}

impl OptionContract {
    /// Whether both sides of the quote are present
    pub fn has_quote(&self) -> bool {
        self.bid > Decimal::ZERO && self.ask > Decimal::ZERO
    }

    /// Mid-price; only defined when both bid and ask are strictly positive
    pub fn mid(&self) -> Option<Decimal> {
        if self.has_quote() {
            Some((self.bid + self.ask) / Decimal::TWO)
        } else {
            None
        }
    }

    /// Short display form for result tables
    pub fn summary(&self) -> String {
        format!("{} (${})", self.contract_id, self.last_price)
    }
}

/// Call contracts for one expiration date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainExpiry {
    pub expiry: NaiveDate,
    pub calls: Vec<OptionContract>,
}

/// Option chain snapshot, expirations ordered nearest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChain {
    pub expirations: Vec<ChainExpiry>,
}

impl OptionChain {
    pub fn front_expiry(&self) -> Option<&ChainExpiry> {
        self.expirations.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn contract(bid: Decimal, ask: Decimal) -> OptionContract {
        OptionContract {
            contract_id: "NVDA260116C00190000".to_string(),
            strike: dec!(190),
            bid,
            ask,
            last_price: dec!(1.02),
            volume: 120,
        }
    }

    #[test]
    fn mid_requires_both_sides() {
        assert_eq!(contract(dec!(1.00), dec!(1.05)).mid(), Some(dec!(1.025)));
        assert_eq!(contract(Decimal::ZERO, dec!(1.05)).mid(), None);
        assert_eq!(contract(dec!(1.00), Decimal::ZERO).mid(), None);
        assert_eq!(contract(dec!(-0.5), dec!(1.05)).mid(), None);
    }
}
