//! Cross-replication aggregation
//!
//! Each statistic is averaged arithmetically over the measured reports and
//! compared with its reference interval (if one is configured).

use crate::models::report::{ReplicationStats, SimulationReport};
use crate::orchestrator::config::{ReferenceBounds, ReferenceInterval, SimulatorConfig};
use crate::orchestrator::engine::SimulationError;
use serde::{Deserialize, Serialize};

/// Mean and spread of one statistic across replications
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticSummary {
    /// Arithmetic mean over replications
    pub mean: f64,

    /// Sample standard deviation (0 for a single replication)
    pub std_dev: f64,

    /// Interval the mean was checked against
    pub bounds: Option<ReferenceInterval>,

    /// `mean < lower || mean > upper`; always false without bounds
    pub out_of_bounds: bool,
}

impl StatisticSummary {
    /// Summarize non-empty `samples`
    ///
    /// # Example
    /// ```
    /// use tandem_simulator_core_rs::{ReferenceInterval, StatisticSummary};
    ///
    /// let s = StatisticSummary::from_samples(&[1.0, 2.0, 3.0], Some(ReferenceInterval::new(0.0, 1.5)));
    /// assert_eq!(s.mean, 2.0);
    /// assert_eq!(s.std_dev, 1.0);
    /// assert!(s.out_of_bounds);
    /// ```
    pub fn from_samples(samples: &[f64], bounds: Option<ReferenceInterval>) -> Self {
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let std_dev = if samples.len() > 1 {
            let ss: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
            (ss / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        let out_of_bounds = bounds.is_some_and(|b| b.is_out_of_bounds(mean));

        Self {
            mean,
            std_dev,
            bounds,
            out_of_bounds,
        }
    }
}

/// Averaged statistics over all measured replications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationSummary {
    pub replications: usize,
    pub stage1_utilization: StatisticSummary,
    pub stage2_utilization: StatisticSummary,
    pub stage3_utilization: StatisticSummary,
    pub average_time: StatisticSummary,
    pub average_number_jobs: StatisticSummary,

    /// Jobs shed by station 3, averaged per replication
    pub mean_shed_jobs: f64,
}

impl ReplicationSummary {
    /// Aggregate measured reports
    ///
    /// Fails if `reports` is empty or any report cannot produce its
    /// statistics.
    pub fn from_reports(
        reports: &[SimulationReport],
        bounds: &ReferenceBounds,
    ) -> Result<Self, SimulationError> {
        if reports.is_empty() {
            return Err(SimulationError::InvalidConfig(
                "cannot summarize zero replications".to_string(),
            ));
        }

        let stats = reports
            .iter()
            .map(SimulationReport::statistics)
            .collect::<Result<Vec<ReplicationStats>, _>>()?;

        let column = |f: fn(&ReplicationStats) -> f64| stats.iter().map(f).collect::<Vec<f64>>();

        let shed_total: u64 = reports.iter().map(|r| r.shed_jobs).sum();

        Ok(Self {
            replications: reports.len(),
            stage1_utilization: StatisticSummary::from_samples(
                &column(|s| s.stage1_utilization),
                bounds.stage1_utilization,
            ),
            stage2_utilization: StatisticSummary::from_samples(
                &column(|s| s.stage2_utilization),
                bounds.stage2_utilization,
            ),
            stage3_utilization: StatisticSummary::from_samples(
                &column(|s| s.stage3_utilization),
                bounds.stage3_utilization,
            ),
            average_time: StatisticSummary::from_samples(
                &column(|s| s.average_time),
                bounds.average_time,
            ),
            average_number_jobs: StatisticSummary::from_samples(
                &column(|s| s.average_number_jobs),
                bounds.average_number_jobs,
            ),
            mean_shed_jobs: shed_total as f64 / reports.len() as f64,
        })
    }

    /// Mean of each statistic
    pub fn averages(&self) -> ReplicationStats {
        ReplicationStats {
            stage1_utilization: self.stage1_utilization.mean,
            stage2_utilization: self.stage2_utilization.mean,
            stage3_utilization: self.stage3_utilization.mean,
            average_time: self.average_time.mean,
            average_number_jobs: self.average_number_jobs.mean,
        }
    }

    /// True when no statistic is flagged out of bounds
    pub fn all_within_bounds(&self) -> bool {
        [
            &self.stage1_utilization,
            &self.stage2_utilization,
            &self.stage3_utilization,
            &self.average_time,
            &self.average_number_jobs,
        ]
        .iter()
        .all(|s| !s.out_of_bounds)
    }
}

/// Everything produced by one experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// SHA-256 of the configuration that produced these results
    pub config_fingerprint: String,

    /// Seed used by each replication, in order
    pub replication_seeds: Vec<u64>,

    /// Measured report of each replication, in order
    pub reports: Vec<SimulationReport>,

    pub summary: ReplicationSummary,
}

impl ExperimentResult {
    pub fn new(
        config: &SimulatorConfig,
        replication_seeds: Vec<u64>,
        reports: Vec<SimulationReport>,
    ) -> Result<Self, SimulationError> {
        let summary = ReplicationSummary::from_reports(&reports, &config.reference)?;
        Ok(Self {
            config_fingerprint: config.fingerprint()?,
            replication_seeds,
            reports,
            summary,
        })
    }
}
