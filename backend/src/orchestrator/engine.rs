//! Simulation Engine
//!
//! Main event loop driving jobs through the tandem line:
//! - Arrivals (one seed job per source, replacements spawned on arrival)
//! - Stage 1 and stage 2 service (single server, busy-clock serialized)
//! - Admission control at stage 3 (bounded occupancy, overflow shed)
//! - Statistics accumulation into a [`SimulationReport`]
//!
//! # Architecture
//!
//! ```text
//! For each event:
//! 1. Pop the earliest-due live job from the event store
//! 2. Advance the clock to its due time
//! 3. Apply the transition for its stage
//!    Initialized → spawn replacement arrival, move to Stage1
//!    Stage1      → serve at station 1, move to Stage2
//!    Stage2      → serve at station 2, move to Stage2Done
//!    Stage2Done  → admit to station 3 (serve, Stage3) or shed (Terminal)
//!    Stage3      → record sojourn, Terminal
//! 4. Reinsert the job unless it left the system
//! 5. Update the time-weighted population
//! ```
//!
//! A replication runs the loop twice from an empty network: once as a
//! warm-up whose report is discarded, then as the measured run.
//!
//! # Example
//!
//! ```rust
//! use tandem_simulator_core_rs::{Simulator, SimulatorConfig};
//!
//! let config = SimulatorConfig {
//!     replications: 3,
//!     warmup_jobs: 100,
//!     measured_jobs: 500,
//!     rng_seed: Some(12345),
//!     ..SimulatorConfig::default()
//! };
//!
//! let mut simulator = Simulator::new(config).unwrap();
//! let result = simulator.run_experiment().unwrap();
//!
//! assert_eq!(result.reports.len(), 3);
//! let util = result.summary.stage1_utilization.mean;
//! assert!(util > 0.0 && util <= 1.0);
//! ```

use crate::core::time::{ClockRegression, SimClock};
use crate::events::store::{EventStore, StoreError};
use crate::models::event::TransitionEvent;
use crate::models::job::{Job, JobId, JobSource, Stage};
use crate::models::report::{ReportError, SimulationReport};
use crate::models::station::Station;
use crate::orchestrator::config::SimulatorConfig;
use crate::orchestrator::summary::{ExperimentResult, ReplicationSummary};
use crate::rng::{SeedSequence, UniformSource};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Upper bound on transitions per job (Initialized, Stage1, Stage2,
/// Stage2Done, Stage3)
const TRANSITIONS_PER_JOB: u64 = 5;

/// Simulation error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Event store rejected an operation
    #[error("Event store error: {0}")]
    Store(#[from] StoreError),

    /// An event was due before the current clock
    #[error("Clock regression: {0}")]
    ClockRegression(#[from] ClockRegression),

    /// Safety bound on processed events was hit
    #[error("Run exceeded {limit} events before reaching {target} completions")]
    EventLimitExceeded { limit: u64, target: u64 },

    /// A statistic could not be derived
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// A replication aborted; earlier replications are unaffected
    #[error("Replication {replication} (seed {seed}) failed: {source}")]
    ReplicationFailed {
        replication: usize,
        seed: u64,
        #[source]
        source: Box<SimulationError>,
    },
}

/// Discrete-event simulator for the three-stage tandem network
///
/// Owns its event store, clock and generator. All randomness flows through
/// `rng`; the same seed and configuration always reproduce the same reports.
pub struct Simulator {
    config: SimulatorConfig,

    /// Variate generator, reseeded at the start of each replication
    rng: Box<dyn UniformSource>,

    /// Source of per-replication seeds
    seeds: SeedSequence,

    /// Seeds used by the replications run so far
    replication_seeds: Vec<u64>,

    /// In-flight jobs
    store: EventStore,

    clock: SimClock,

    /// Ids issued in the current run (reset per run)
    next_job_id: u64,

    /// Jobs currently admitted to station 3
    stage3_occupancy: usize,
}

impl Simulator {
    /// Create a simulator from configuration
    ///
    /// The generator starts from `config.rng_seed`, or from fresh entropy
    /// when no seed is configured.
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulationError> {
        let initial_seed = config
            .rng_seed
            .unwrap_or_else(|| SeedSequence::new(None).next_seed());
        Self::with_seed(config, initial_seed)
    }

    /// Create a simulator whose generator starts from `seed`
    pub fn with_seed(config: SimulatorConfig, seed: u64) -> Result<Self, SimulationError> {
        config.validate()?;

        Ok(Self {
            rng: config.generator.build(seed),
            seeds: SeedSequence::new(config.rng_seed),
            replication_seeds: Vec::new(),
            store: EventStore::new(),
            clock: SimClock::new(),
            next_job_id: 0,
            stage3_occupancy: 0,
            config,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Seeds used by the replications run so far, in order
    pub fn replication_seeds(&self) -> &[u64] {
        &self.replication_seeds
    }

    /// Current generator state
    pub fn rng_state(&self) -> u64 {
        self.rng.state()
    }

    /// Reseed the variate generator
    pub fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }

    /// Transition bound for a run targeting `target` completions
    pub fn event_limit(&self, target: u64) -> u64 {
        self.config
            .max_events_per_run
            .unwrap_or_else(|| TRANSITIONS_PER_JOB * target.max(JobSource::ALL.len() as u64))
    }

    // ========================================================================
    // Replication loop
    // ========================================================================

    /// Run the experiment described by the configuration
    ///
    /// Runs every replication, then aggregates the measured reports and
    /// checks them against the reference intervals.
    pub fn run_experiment(&mut self) -> Result<ExperimentResult, SimulationError> {
        let first_seed = self.replication_seeds.len();
        let reports = self.run_replications(
            self.config.replications,
            self.config.warmup_jobs,
            self.config.measured_jobs,
        )?;
        let seeds = self.replication_seeds[first_seed..].to_vec();

        let result = ExperimentResult::new(&self.config, seeds, reports)?;
        info!(
            replications = result.reports.len(),
            within_bounds = result.summary.all_within_bounds(),
            "Experiment complete"
        );
        Ok(result)
    }

    /// Run `replications` warm-up + measured pairs
    ///
    /// Returns the measured reports in replication order. A report is only
    /// appended once its replication has completed.
    pub fn run_replications(
        &mut self,
        replications: usize,
        warmup_target: u64,
        measured_target: u64,
    ) -> Result<Vec<SimulationReport>, SimulationError> {
        let mut reports = Vec::with_capacity(replications);

        for replication in 0..replications {
            let seed = self.seeds.next_seed();
            self.replication_seeds.push(seed);
            let report = self.run_replication(replication, seed, warmup_target, measured_target)?;
            reports.push(report);
        }

        Ok(reports)
    }

    /// Run one replication: reseed, warm-up run (discarded), measured run
    pub fn run_replication(
        &mut self,
        replication: usize,
        seed: u64,
        warmup_target: u64,
        measured_target: u64,
    ) -> Result<SimulationReport, SimulationError> {
        debug!(replication, seed, warmup_target, measured_target, "Replication starting");

        self.reseed(seed);
        let wrap = move |e: SimulationError| SimulationError::ReplicationFailed {
            replication,
            seed,
            source: Box::new(e),
        };

        self.run(warmup_target).map_err(wrap)?;
        let report = self.run(measured_target).map_err(wrap)?;

        debug!(
            replication,
            clock = report.clock,
            completed = report.completed_jobs,
            shed = report.shed_jobs,
            "Replication complete"
        );
        Ok(report)
    }

    /// Aggregate reports with this simulator's reference intervals
    pub fn summarize(&self, reports: &[SimulationReport]) -> Result<ReplicationSummary, SimulationError> {
        ReplicationSummary::from_reports(reports, &self.config.reference)
    }

    // ========================================================================
    // Event loop
    // ========================================================================

    /// Run the network from empty until `target` jobs have left it
    pub fn run(&mut self, target: u64) -> Result<SimulationReport, SimulationError> {
        self.run_observed(target, |_| {})
    }

    /// Like [`Simulator::run`], calling `observer` after every transition
    pub fn run_observed<F>(&mut self, target: u64, mut observer: F) -> Result<SimulationReport, SimulationError>
    where
        F: FnMut(&TransitionEvent),
    {
        self.reset();
        let mut report = SimulationReport::new(target);

        if target == 0 {
            debug!("Zero-job run requested; returning empty report");
            return Ok(report);
        }

        for source in JobSource::ALL {
            self.spawn(source, &mut report)?;
        }
        report.update_average_number_jobs(self.store.len());

        let limit = self.event_limit(target);

        while report.completed_jobs < target {
            let Some(job) = self.store.pop_earliest_live() else {
                warn!(
                    completed = report.completed_jobs,
                    target,
                    clock = report.clock,
                    "Event store ran dry before reaching target"
                );
                break;
            };

            if report.events_processed >= limit {
                return Err(SimulationError::EventLimitExceeded { limit, target });
            }

            self.clock.advance_to(job.due_time())?;
            report.clock = self.clock.now();

            let event = self.transition(job, &mut report, target)?;
            report.events_processed += 1;
            report.update_average_number_jobs(self.store.len());

            observer(&event);
        }

        report.close_stations();

        debug!(
            target,
            clock = report.clock,
            events = report.events_processed,
            "Run complete"
        );
        Ok(report)
    }

    /// Clear all per-run state
    fn reset(&mut self) {
        self.store.clear();
        self.clock.reset();
        self.next_job_id = 0;
        self.stage3_occupancy = 0;
    }

    /// Create a job from `source` at the current clock
    fn spawn(&mut self, source: JobSource, report: &mut SimulationReport) -> Result<(), SimulationError> {
        self.next_job_id += 1;
        let now = self.clock.now();
        let due_time = now + self.rng.exponential(self.config.interarrival_mean(source));
        self.store
            .insert(Job::new(JobId(self.next_job_id), source, now, due_time))?;
        report.jobs_created += 1;
        Ok(())
    }

    /// Draw a service time at `station` and schedule its completion
    fn serve(&mut self, job: &mut Job, station: Station, report: &mut SimulationReport) {
        let service = self.rng.exponential(self.config.service_mean(station));
        let completes_at = report.station_mut(station).serve(job.due_time(), service);
        job.schedule_service(service, completes_at);
    }

    /// Apply the stage transition for `job`
    ///
    /// The job has already been removed from the store; it is reinserted
    /// here unless it leaves the system.
    fn transition(
        &mut self,
        mut job: Job,
        report: &mut SimulationReport,
        target: u64,
    ) -> Result<TransitionEvent, SimulationError> {
        let from = job.stage();

        match from {
            Stage::Initialized => {
                // Arrivals stop once `target` ids have been issued
                if self.next_job_id < target {
                    self.spawn(job.source(), report)?;
                }
                job.advance_stage(Stage::Stage1);
            }
            Stage::Stage1 => {
                self.serve(&mut job, Station::First, report);
                job.advance_stage(Stage::Stage2);
            }
            Stage::Stage2 => {
                self.serve(&mut job, Station::Second, report);
                job.advance_stage(Stage::Stage2Done);
            }
            Stage::Stage2Done => {
                if self.stage3_occupancy < self.config.stage3_capacity {
                    self.stage3_occupancy += 1;
                    report.peak_stage3_occupancy = report.peak_stage3_occupancy.max(self.stage3_occupancy);
                    self.serve(&mut job, Station::Third, report);
                    job.advance_stage(Stage::Stage3);
                } else {
                    trace!(job = %job.id(), clock = report.clock, "Station 3 full, job shed");
                    report.completed_jobs += 1;
                    report.shed_jobs += 1;
                    job.advance_stage(Stage::Terminal);
                }
            }
            Stage::Stage3 => {
                report.sojourn_history += job.sojourn(self.clock.now());
                report.completed_jobs += 1;
                self.stage3_occupancy = self.stage3_occupancy.saturating_sub(1);
                job.advance_stage(Stage::Terminal);
            }
            Stage::Terminal => {
                // The store never yields terminal jobs; drop it if one appears.
                warn!(job = %job.id(), "Terminal job popped from event store");
            }
        }

        let (job_id, source, to, due_time) = (job.id(), job.source(), job.stage(), job.due_time());
        if !to.is_terminal() {
            self.store.insert(job)?;
        }

        Ok(TransitionEvent {
            clock: self.clock.now(),
            job_id,
            source,
            from,
            to,
            due_time,
            live_jobs: self.store.len(),
            stage3_occupancy: self.stage3_occupancy,
        })
    }
}
