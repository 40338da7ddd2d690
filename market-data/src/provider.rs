// Market Data Provider Seam
// The engine consumes quotes through this trait; fetching lives elsewhere

use anyhow::Result;
use async_trait::async_trait;
use common::{Bar, OptionChain};
use rust_decimal::Decimal;

/// Read-only access to market observations for one instrument
///
/// `Ok(None)` means the provider had no data for the symbol. Callers treat
/// that the same as a transport failure: the evaluation degrades to an
/// insufficient-data rejection, it never aborts.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Current price of the underlying
    async fn price(&self, symbol: &str) -> Result<Option<Decimal>>;

    /// Recent OHLC bars, ascending by time
    async fn bars(&self, symbol: &str) -> Result<Option<Vec<Bar>>>;

    /// Option chain with expirations ordered nearest first
    async fn option_chain(&self, symbol: &str) -> Result<Option<OptionChain>>;
}
