// Raw Chain Payloads
// Provider-side JSON rows scrubbed into domain contracts before any gate math

use anyhow::{Context, Result};
use chrono::NaiveDate;
use common::{ChainExpiry, OptionChain, OptionContract};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

/// One option row as delivered by a chain feed
///
/// Price fields may be missing, null, NaN or out of range.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOptionContract {
    #[serde(rename = "contractSymbol")]
    pub contract_symbol: String,
    pub strike: f64,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    #[serde(rename = "lastPrice")]
    pub last_price: Option<f64>,
    pub volume: Option<i64>,
}

impl RawOptionContract {
    /// Scrub the raw row into a domain contract
    ///
    /// Missing, NaN or negative price fields collapse to zero, which the
    /// liveness gate rejects as an invalid quote. Bad feed data fails
    /// closed instead of flowing NaN into the gate arithmetic.
    pub fn normalize(self) -> OptionContract {
        let bid = sanitize_price(self.bid);
        let ask = sanitize_price(self.ask);
        if bid.is_zero() || ask.is_zero() {
            debug!(
                "quote for {} is missing a side, will fail closed",
                self.contract_symbol
            );
        }
        OptionContract {
            contract_id: self.contract_symbol,
            strike: sanitize_price(Some(self.strike)),
            bid,
            ask,
            last_price: sanitize_price(self.last_price),
            volume: self.volume.unwrap_or(0).max(0) as u64,
        }
    }
}

fn sanitize_price(raw: Option<f64>) -> Decimal {
    match raw {
        Some(v) if v.is_finite() && v > 0.0 => Decimal::from_f64(v).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Call rows for one expiration date
#[derive(Debug, Clone, Deserialize)]
pub struct RawChainExpiry {
    pub expiry: NaiveDate,
    pub calls: Vec<RawOptionContract>,
}

/// Full chain payload as delivered by a provider
#[derive(Debug, Clone, Deserialize)]
pub struct RawChain {
    pub expirations: Vec<RawChainExpiry>,
}

impl RawChain {
    pub fn normalize(self) -> OptionChain {
        OptionChain {
            expirations: self
                .expirations
                .into_iter()
                .map(|e| ChainExpiry {
                    expiry: e.expiry,
                    calls: e.calls.into_iter().map(RawOptionContract::normalize).collect(),
                })
                .collect(),
        }
    }
}

/// Parse and scrub a JSON chain payload
pub fn chain_from_json(payload: &str) -> Result<OptionChain> {
    let raw: RawChain = serde_json::from_str(payload).context("malformed chain payload")?;
    Ok(raw.normalize())
}
