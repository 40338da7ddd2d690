// Signal Classification Engine
// Phase-aware dual-gate grading of trading candidates

pub mod config;
pub mod engine;
pub mod indicators;
pub mod liveness;
pub mod phase;
pub mod rating;
pub mod structure;

pub use config::{EngineConfig, LivenessConfig, StructureConfig};
pub use engine::{SignalEngine, WatchItem};
pub use liveness::LivenessRadar;
pub use phase::PhaseClock;
pub use rating::rate;
pub use structure::{StructureGate, StructureTier, StructureVerdict};
