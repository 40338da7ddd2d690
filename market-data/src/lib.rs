// Market Data Access
// Provider seam supplying bars, prices and option chains to the signal engine

pub mod atm;
pub mod chain;
pub mod fixture;
pub mod provider;

pub use atm::atm_call;
pub use chain::{chain_from_json, RawChain, RawChainExpiry, RawOptionContract};
pub use fixture::StaticProvider;
pub use provider::MarketDataProvider;
