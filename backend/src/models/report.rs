//! Per-run simulation report
//!
//! Accumulates raw totals while a run executes and derives the steady-state
//! statistics once it has finished:
//!
//! - Utilization of each station: service history / clock
//! - Mean time in system: sojourn history / target job count
//! - Mean number in system: area under the job-count curve / clock
//!
//! # Critical Invariants
//!
//! 1. The area accumulator is updated on every population change
//! 2. Statistics with a zero denominator are reported as insufficient data,
//!    never as NaN or infinity

use crate::models::station::{Station, StationClock};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when deriving statistics from a report
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("insufficient data to compute {statistic}")]
    InsufficientData { statistic: &'static str },
}

/// The five headline statistics of one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplicationStats {
    pub stage1_utilization: f64,
    pub stage2_utilization: f64,
    pub stage3_utilization: f64,
    pub average_time: f64,
    pub average_number_jobs: f64,
}

/// Accumulated measurements for one run (warm-up or measured)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Number of completions the run was asked to reach
    pub target_jobs: u64,

    /// Final simulation time
    pub clock: f64,

    /// Busy-clocks and service histories, indexed by [`Station::index`]
    pub stations: [StationClock; 3],

    /// Total time-in-system of jobs that finished station 3
    pub sojourn_history: f64,

    // Time-average population
    pub area_under_job_count: f64,
    pub prev_job_count: usize,
    pub prev_clock: f64,

    /// Jobs created during the run (seeds included)
    pub jobs_created: u64,

    /// Jobs that reached the terminal stage (including shed jobs)
    pub completed_jobs: u64,

    /// Jobs rejected by a full third station
    pub shed_jobs: u64,

    /// Transitions executed
    pub events_processed: u64,

    /// Highest concurrent occupancy of station 3
    pub peak_stage3_occupancy: usize,
}

impl SimulationReport {
    /// Empty report for a run targeting `target_jobs` completions
    pub fn new(target_jobs: u64) -> Self {
        Self {
            target_jobs,
            clock: 0.0,
            stations: [StationClock::default(); 3],
            sojourn_history: 0.0,
            area_under_job_count: 0.0,
            prev_job_count: 0,
            prev_clock: 0.0,
            jobs_created: 0,
            completed_jobs: 0,
            shed_jobs: 0,
            events_processed: 0,
            peak_stage3_occupancy: 0,
        }
    }

    pub fn station(&self, station: Station) -> &StationClock {
        &self.stations[station.index()]
    }

    pub fn station_mut(&mut self, station: Station) -> &mut StationClock {
        &mut self.stations[station.index()]
    }

    /// Fold the interval since the last population change into the area
    /// and record the new population.
    pub fn update_average_number_jobs(&mut self, current_job_count: usize) {
        self.area_under_job_count += self.prev_job_count as f64 * (self.clock - self.prev_clock);
        self.prev_job_count = current_job_count;
        self.prev_clock = self.clock;
    }

    /// Count only service completed by the final clock
    pub fn close_stations(&mut self) {
        let clock = self.clock;
        for station in self.stations.iter_mut() {
            station.close_at(clock);
        }
    }

    /// Whether no simulated time has elapsed or no jobs were targeted
    pub fn is_insufficient(&self) -> bool {
        self.clock <= 0.0 || self.target_jobs == 0
    }

    /// Fraction of the run during which `station` was serving
    pub fn utilization(&self, station: Station) -> Result<f64, ReportError> {
        let statistic = match station {
            Station::First => "stage 1 utilization",
            Station::Second => "stage 2 utilization",
            Station::Third => "stage 3 utilization",
        };
        self.per_clock(self.station(station).history(), statistic)
    }

    pub fn stage1_utilization(&self) -> Result<f64, ReportError> {
        self.utilization(Station::First)
    }

    pub fn stage2_utilization(&self) -> Result<f64, ReportError> {
        self.utilization(Station::Second)
    }

    pub fn stage3_utilization(&self) -> Result<f64, ReportError> {
        self.utilization(Station::Third)
    }

    /// Mean time in system per targeted job
    pub fn average_time(&self) -> Result<f64, ReportError> {
        if self.target_jobs == 0 {
            return Err(ReportError::InsufficientData {
                statistic: "average time in system",
            });
        }
        Ok(self.sojourn_history / self.target_jobs as f64)
    }

    /// Time-averaged number of jobs in the system
    pub fn average_number_jobs(&self) -> Result<f64, ReportError> {
        self.per_clock(self.area_under_job_count, "average number of jobs")
    }

    /// All headline statistics at once
    pub fn statistics(&self) -> Result<ReplicationStats, ReportError> {
        Ok(ReplicationStats {
            stage1_utilization: self.stage1_utilization()?,
            stage2_utilization: self.stage2_utilization()?,
            stage3_utilization: self.stage3_utilization()?,
            average_time: self.average_time()?,
            average_number_jobs: self.average_number_jobs()?,
        })
    }

    fn per_clock(&self, total: f64, statistic: &'static str) -> Result<f64, ReportError> {
        if self.clock <= 0.0 {
            return Err(ReportError::InsufficientData { statistic });
        }
        Ok(total / self.clock)
    }
}
