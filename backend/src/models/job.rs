//! Job model
//!
//! A job is one unit of work travelling through the tandem line:
//! arrival → stage 1 → stage 2 → (admission) → stage 3 → exit.
//!
//! Each job carries:
//! - The source group it arrived from
//! - Its current stage
//! - The due time of its next transition
//! - The time it entered the system

use serde::{Deserialize, Serialize};
use std::fmt;

/// Arrival source (user group)
///
/// Each source has its own mean inter-arrival time. Replacement arrivals
/// are always spawned from the same source as the job that triggered them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JobSource {
    Group1,
    Group2,
    Group3,
}

impl JobSource {
    /// All sources in seeding order
    pub const ALL: [JobSource; 3] = [JobSource::Group1, JobSource::Group2, JobSource::Group3];

    /// Position in [`JobSource::ALL`]
    pub fn index(self) -> usize {
        match self {
            JobSource::Group1 => 0,
            JobSource::Group2 => 1,
            JobSource::Group3 => 2,
        }
    }
}

/// Position of a job in the pipeline
///
/// Transitions always move forward:
/// `Initialized → Stage1 → Stage2 → Stage2Done → Stage3 → Terminal`,
/// with a shortcut `Stage2Done → Terminal` when the third station is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    /// Scheduled arrival, not yet at stage 1
    Initialized,
    /// Waiting for / receiving service at station 1
    Stage1,
    /// Waiting for / receiving service at station 2
    Stage2,
    /// Finished station 2, awaiting admission to station 3
    Stage2Done,
    /// Admitted to station 3
    Stage3,
    /// Left the system
    Terminal,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        self == Stage::Terminal
    }
}

/// Job identifier, unique within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job_{:06}", self.0)
    }
}

/// A unit of work in the network
///
/// # Example
/// ```
/// use tandem_simulator_core_rs::{Job, JobId, JobSource, Stage};
///
/// let job = Job::new(JobId(1), JobSource::Group3, 0.0, 7.25);
/// assert_eq!(job.stage(), Stage::Initialized);
/// assert_eq!(job.due_time(), 7.25);
/// assert_eq!(job.system_entry_time(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    source: JobSource,
    stage: Stage,

    /// Simulation time at which the current wait/service period ends
    due_time: f64,

    /// Most recently drawn service duration
    service_time: f64,

    /// Simulation time when the job was created
    system_entry_time: f64,
}

impl Job {
    /// Create a job in the `Initialized` stage
    ///
    /// # Panics
    /// Panics if `due_time < created_at`
    pub fn new(id: JobId, source: JobSource, created_at: f64, due_time: f64) -> Self {
        assert!(
            due_time >= created_at,
            "due_time must not precede creation time"
        );
        Self {
            id,
            source,
            stage: Stage::Initialized,
            due_time,
            service_time: 0.0,
            system_entry_time: created_at,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn source(&self) -> JobSource {
        self.source
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn due_time(&self) -> f64 {
        self.due_time
    }

    pub fn service_time(&self) -> f64 {
        self.service_time
    }

    pub fn system_entry_time(&self) -> f64 {
        self.system_entry_time
    }

    /// Time spent in the system up to `now`
    pub fn sojourn(&self, now: f64) -> f64 {
        now - self.system_entry_time
    }

    /// Move to `stage` without changing the due time
    pub fn advance_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    /// Record a service of `service_time` that ends at `completes_at`
    ///
    /// # Panics
    /// Panics if the new due time would move the job backwards in time.
    pub fn schedule_service(&mut self, service_time: f64, completes_at: f64) {
        assert!(
            completes_at >= self.due_time,
            "job {} cannot move back from {} to {}",
            self.id,
            self.due_time,
            completes_at
        );
        self.service_time = service_time;
        self.due_time = completes_at;
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{:?}] due {}", self.id, self.stage, self.due_time)
    }
}
