// Engine Configuration
// Gate thresholds and scan limits, overridable from TOML

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Structural gate thresholds
///
/// All fractional values are on the native price scale (0.0015 = 0.15%).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Minimum bars required for an evaluation
    pub min_bars: usize,
    /// Closes inspected by the choppiness filter
    pub choppiness_window: usize,
    /// Population CV below this marks "barb wire" chop
    pub choppiness_floor: f64,
    /// Mid-range veto band over the range position
    pub mid_band_low: f64,
    pub mid_band_high: f64,
    /// Relative distance to the fast EMA that still counts as hugging it
    pub ema_tolerance: f64,
    /// Minimum ATR as a fraction of the last close
    pub atr_floor: f64,
    /// EMA spans used to resolve the trend
    pub ema_fast_span: usize,
    pub ema_slow_span: usize,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            min_bars: 5,
            choppiness_window: 12,
            choppiness_floor: 0.02,
            mid_band_low: 0.35,
            mid_band_high: 0.65,
            ema_tolerance: 0.02,
            atr_floor: 0.0015,
            ema_fast_span: 20,
            ema_slow_span: 50,
        }
    }
}

/// Liveness radar settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LivenessConfig {
    /// Mid-prices retained per contract
    pub history_capacity: usize,
    /// Mid drop (as a fraction) against a rising underlying that counts
    /// as momentum divergence
    pub divergence_drop: Decimal,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            history_capacity: 5,
            divergence_drop: dec!(0.01),
        }
    }
}

/// Engine-wide settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub scan: ScanConfig,
    pub structure: StructureConfig,
    pub liveness: LivenessConfig,
}

/// Batch scan limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Concurrent evaluations per scan cycle
    pub max_concurrent: usize,
    /// Delay inserted before each symbol's fetches, to stay under provider
    /// rate limits
    pub throttle_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 8,
            throttle_ms: 50,
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml(doc: &str) -> Result<Self> {
        toml::from_str(doc).context("invalid engine config")
    }
}
