// Fixture Provider
// Deterministic in-memory market data for tests and the demo binary

use crate::provider::MarketDataProvider;
use anyhow::Result;
use async_trait::async_trait;
use common::{Bar, OptionChain};
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

/// In-memory market data keyed by symbol
///
/// Chains are a FIFO sequence per symbol so successive polls observe moving
/// quotes; the final chain repeats once the sequence is drained. That is
/// enough to exercise the radar's cross-cycle quote history without a feed.
#[derive(Default)]
pub struct StaticProvider {
    prices: HashMap<String, Decimal>,
    bars: HashMap<String, Vec<Bar>>,
    chains: Mutex<HashMap<String, VecDeque<OptionChain>>>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, symbol: &str, price: Decimal) -> Self {
        self.prices.insert(symbol.to_string(), price);
        self
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.bars.insert(symbol.to_string(), bars);
        self
    }

    /// Queue the chains this symbol will serve, one per poll
    pub fn with_chain_sequence(mut self, symbol: &str, chains: Vec<OptionChain>) -> Self {
        self.chains
            .get_mut()
            .insert(symbol.to_string(), chains.into());
        self
    }

    pub fn with_chain(self, symbol: &str, chain: OptionChain) -> Self {
        self.with_chain_sequence(symbol, vec![chain])
    }
}

#[async_trait]
impl MarketDataProvider for StaticProvider {
    async fn price(&self, symbol: &str) -> Result<Option<Decimal>> {
        Ok(self.prices.get(symbol).copied())
    }

    async fn bars(&self, symbol: &str) -> Result<Option<Vec<Bar>>> {
        Ok(self.bars.get(symbol).cloned())
    }

    async fn option_chain(&self, symbol: &str) -> Result<Option<OptionChain>> {
        let mut chains = self.chains.lock().await;
        let Some(queue) = chains.get_mut(symbol) else {
            return Ok(None);
        };
        if queue.len() > 1 {
            Ok(queue.pop_front())
        } else {
            Ok(queue.front().cloned())
        }
    }
}
