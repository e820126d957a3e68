//! Parallel replications
//!
//! Replications share no state, so each one runs on its own [`Simulator`]
//! (own event store, report and generator) on the rayon pool. Seeds come
//! from the same [`SeedSequence`] the sequential loop uses, which makes the
//! two paths produce identical reports for a fixed master seed.

use crate::models::report::SimulationReport;
use crate::orchestrator::config::SimulatorConfig;
use crate::orchestrator::engine::{SimulationError, Simulator};
use crate::orchestrator::summary::ExperimentResult;
use crate::rng::SeedSequence;
use rayon::prelude::*;
use tracing::info;

/// Run every replication of `config` in parallel
///
/// # Example
///
/// ```rust
/// use tandem_simulator_core_rs::{run_parallel, SimulatorConfig};
///
/// let config = SimulatorConfig {
///     replications: 4,
///     warmup_jobs: 50,
///     measured_jobs: 200,
///     rng_seed: Some(1),
///     ..SimulatorConfig::default()
/// };
///
/// let result = run_parallel(&config).unwrap();
/// assert_eq!(result.reports.len(), 4);
/// ```
pub fn run_parallel(config: &SimulatorConfig) -> Result<ExperimentResult, SimulationError> {
    config.validate()?;

    let seeds: Vec<u64> = SeedSequence::new(config.rng_seed)
        .take(config.replications)
        .collect();

    let reports = seeds
        .par_iter()
        .enumerate()
        .map(|(replication, &seed)| run_isolated(config, replication, seed))
        .collect::<Result<Vec<SimulationReport>, SimulationError>>()?;

    let result = ExperimentResult::new(config, seeds, reports)?;
    info!(
        replications = result.reports.len(),
        within_bounds = result.summary.all_within_bounds(),
        "Parallel experiment complete"
    );
    Ok(result)
}

fn run_isolated(
    config: &SimulatorConfig,
    replication: usize,
    seed: u64,
) -> Result<SimulationReport, SimulationError> {
    let mut simulator = Simulator::with_seed(config.clone(), seed)?;
    simulator.run_replication(replication, seed, config.warmup_jobs, config.measured_jobs)
}
