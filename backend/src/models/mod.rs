//! Domain models for the tandem network simulator

pub mod event;
pub mod job;
pub mod report;
pub mod station;

// Re-exports
pub use event::TransitionEvent;
pub use job::{Job, JobId, JobSource, Stage};
pub use report::{ReplicationStats, ReportError, SimulationReport};
pub use station::{Station, StationClock};
