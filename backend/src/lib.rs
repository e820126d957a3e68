//! Tandem Network Simulator Core - Rust Engine
//!
//! Discrete-event simulator of a three-stage tandem queueing network fed by
//! three independent arrival sources, with deterministic replications.
//!
//! # Architecture
//!
//! - **core**: Simulation clock
//! - **models**: Domain types (Job, Station, SimulationReport)
//! - **events**: Time-ordered event store
//! - **orchestrator**: Configuration, event loop, replications, aggregation
//! - **rng**: Deterministic random variate generation
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (seeded generator per replication)
//! 2. Simulation time never moves backwards
//! 3. A station never serves two jobs at once; station 3 never exceeds
//!    its capacity

// Module declarations
pub mod core;
pub mod events;
pub mod models;
pub mod orchestrator;
pub mod rng;

// Re-exports for convenience
pub use crate::core::time::SimClock;
pub use events::{EventStore, StoreError};
pub use models::{
    event::TransitionEvent,
    job::{Job, JobId, JobSource, Stage},
    report::{ReplicationStats, ReportError, SimulationReport},
    station::{Station, StationClock},
};
pub use orchestrator::{
    run_parallel, ExperimentResult, ReferenceBounds, ReferenceInterval, ReplicationSummary,
    SimulationError, Simulator, SimulatorConfig, StatisticSummary,
};
pub use rng::{GeneratorKind, RngManager, UniformSource};
