//! Orchestrator - configuration, event loop and replication control
//!
//! See `engine.rs` for the event loop and stage transitions.

pub mod config;
pub mod engine;
pub mod parallel;
pub mod summary;

// Re-export main types for convenience
pub use config::{ReferenceBounds, ReferenceInterval, SimulatorConfig};
pub use engine::{SimulationError, Simulator};
pub use parallel::run_parallel;
pub use summary::{ExperimentResult, ReplicationSummary, StatisticSummary};
