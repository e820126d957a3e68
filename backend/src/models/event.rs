//! Transition events emitted by the engine
//!
//! Every processed event produces one [`TransitionEvent`] describing the job
//! that moved and the state of the network right after the move. Callers of
//! `Simulator::run_observed` receive them in processing order; nothing is
//! stored by the engine itself.
//!
//! # Example
//!
//! ```rust
//! use tandem_simulator_core_rs::models::{JobId, JobSource, Stage, TransitionEvent};
//!
//! let event = TransitionEvent {
//!     clock: 12.0,
//!     job_id: JobId(7),
//!     source: JobSource::Group2,
//!     from: Stage::Stage2Done,
//!     to: Stage::Terminal,
//!     due_time: 12.0,
//!     live_jobs: 4,
//!     stage3_occupancy: 1,
//! };
//!
//! assert!(event.is_exit());
//! assert!(event.is_shed());
//! ```

use crate::models::job::{JobId, JobSource, Stage};
use serde::{Deserialize, Serialize};

/// One stage transition of one job
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    /// Simulation time of the transition
    pub clock: f64,
    pub job_id: JobId,
    pub source: JobSource,
    pub from: Stage,
    pub to: Stage,

    /// Due time of the job after the transition
    pub due_time: f64,

    /// Jobs in the event store after the transition
    pub live_jobs: usize,

    /// Jobs admitted to station 3 after the transition
    pub stage3_occupancy: usize,
}

impl TransitionEvent {
    /// Job left the system
    pub fn is_exit(&self) -> bool {
        self.to == Stage::Terminal
    }

    /// Job was turned away by a full third station
    pub fn is_shed(&self) -> bool {
        self.from == Stage::Stage2Done && self.to == Stage::Terminal
    }
}
