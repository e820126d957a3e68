//! Simulator configuration
//!
//! All parameters of an experiment live here: replication counts, job
//! targets, arrival and service means, the third station's capacity, the
//! generator choice and the analytic reference intervals used to validate
//! the averaged statistics.
//!
//! `SimulatorConfig::default()` is the reference parameterization
//! (three user groups feeding a 4.5 / 5.0 / 5.8 tandem line with a
//! ten-job limit at the last station).

use crate::models::job::JobSource;
use crate::models::station::Station;
use crate::orchestrator::engine::SimulationError;
use crate::rng::GeneratorKind;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// Reference intervals
// ============================================================================

/// Accepted range for a statistic
///
/// # Example
/// ```
/// use tandem_simulator_core_rs::ReferenceInterval;
///
/// let bounds = ReferenceInterval::new(0.677, 0.717);
/// assert!(!bounds.is_out_of_bounds(0.70));
/// assert!(bounds.is_out_of_bounds(0.75));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceInterval {
    pub lower: f64,
    pub upper: f64,

    /// Analytic point value, when known
    #[serde(default)]
    pub expected: Option<f64>,
}

impl ReferenceInterval {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            expected: None,
        }
    }

    pub fn with_expected(mut self, expected: f64) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn is_out_of_bounds(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Reference intervals for each headline statistic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceBounds {
    pub stage1_utilization: Option<ReferenceInterval>,
    pub stage2_utilization: Option<ReferenceInterval>,
    pub stage3_utilization: Option<ReferenceInterval>,
    pub average_time: Option<ReferenceInterval>,
    pub average_number_jobs: Option<ReferenceInterval>,
}

impl ReferenceBounds {
    /// No bounds: nothing is ever flagged
    pub fn none() -> Self {
        Self {
            stage1_utilization: None,
            stage2_utilization: None,
            stage3_utilization: None,
            average_time: None,
            average_number_jobs: None,
        }
    }

    pub fn utilization(&self, station: Station) -> Option<ReferenceInterval> {
        match station {
            Station::First => self.stage1_utilization,
            Station::Second => self.stage2_utilization,
            Station::Third => self.stage3_utilization,
        }
    }
}

impl Default for ReferenceBounds {
    fn default() -> Self {
        Self {
            stage1_utilization: Some(ReferenceInterval::new(0.677, 0.717).with_expected(0.6975)),
            stage2_utilization: Some(ReferenceInterval::new(0.755, 0.795).with_expected(0.775)),
            stage3_utilization: Some(ReferenceInterval::new(0.833, 0.873).with_expected(0.8536)),
            average_time: None,
            average_number_jobs: None,
        }
    }
}

// ============================================================================
// Simulator configuration
// ============================================================================

/// Complete simulator configuration
///
/// # Example
///
/// ```rust
/// use tandem_simulator_core_rs::SimulatorConfig;
///
/// let config = SimulatorConfig::from_json_str(r#"{
///     "replications": 5,
///     "measured_jobs": 2000,
///     "stage3_capacity": 4,
///     "rng_seed": 99
/// }"#).unwrap();
///
/// assert_eq!(config.replications, 5);
/// assert_eq!(config.warmup_jobs, 1000); // default kept
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Number of independent replications
    pub replications: usize,

    /// Completions in the discarded warm-up run of each replication
    pub warmup_jobs: u64,

    /// Completions in the retained measured run of each replication
    pub measured_jobs: u64,

    /// Mean inter-arrival time per source, indexed by [`JobSource::index`]
    pub interarrival_means: [f64; 3],

    /// Mean service time per station, indexed by [`Station::index`]
    pub service_means: [f64; 3],

    /// Maximum number of jobs admitted to station 3 at once
    pub stage3_capacity: usize,

    /// Master seed for replication seeds (`None` = fresh entropy)
    pub rng_seed: Option<u64>,

    /// Generator algorithm
    pub generator: GeneratorKind,

    /// Upper bound on transitions per run (`None` = derived from the target)
    pub max_events_per_run: Option<u64>,

    /// Analytic reference intervals
    pub reference: ReferenceBounds,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            replications: 30,
            warmup_jobs: 1_000,
            measured_jobs: 10_000,
            interarrival_means: [20.0, 40.0, 12.5],
            service_means: [4.5, 5.0, 5.8],
            stage3_capacity: 10,
            rng_seed: None,
            generator: GeneratorKind::default(),
            max_events_per_run: None,
            reference: ReferenceBounds::default(),
        }
    }
}

impl SimulatorConfig {
    /// Parse a configuration from JSON, filling omitted fields with defaults
    pub fn from_json_str(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json).map_err(|e| {
            SimulationError::InvalidConfig(format!("Config deserialization failed: {}", e))
        })
    }

    pub fn interarrival_mean(&self, source: JobSource) -> f64 {
        self.interarrival_means[source.index()]
    }

    pub fn service_mean(&self, station: Station) -> f64 {
        self.service_means[station.index()]
    }

    /// Validate configuration
    ///
    /// Called before any run starts.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.replications == 0 {
            return Err(SimulationError::InvalidConfig(
                "replications must be > 0".to_string(),
            ));
        }

        if self.warmup_jobs == 0 {
            return Err(SimulationError::InvalidConfig(
                "warmup_jobs must be > 0".to_string(),
            ));
        }

        if self.measured_jobs == 0 {
            return Err(SimulationError::InvalidConfig(
                "measured_jobs must be > 0".to_string(),
            ));
        }

        for source in JobSource::ALL {
            let mean = self.interarrival_mean(source);
            if !(mean.is_finite() && mean > 0.0) {
                return Err(SimulationError::InvalidConfig(format!(
                    "inter-arrival mean for {:?} must be positive and finite, got {}",
                    source, mean
                )));
            }
        }

        for station in Station::ALL {
            let mean = self.service_mean(station);
            if !(mean.is_finite() && mean > 0.0) {
                return Err(SimulationError::InvalidConfig(format!(
                    "service mean for {:?} station must be positive and finite, got {}",
                    station, mean
                )));
            }
        }

        if self.stage3_capacity == 0 {
            return Err(SimulationError::InvalidConfig(
                "stage3_capacity must be > 0".to_string(),
            ));
        }

        if self.max_events_per_run == Some(0) {
            return Err(SimulationError::InvalidConfig(
                "max_events_per_run must be > 0 when set".to_string(),
            ));
        }

        let intervals = [
            ("stage1_utilization", self.reference.stage1_utilization),
            ("stage2_utilization", self.reference.stage2_utilization),
            ("stage3_utilization", self.reference.stage3_utilization),
            ("average_time", self.reference.average_time),
            ("average_number_jobs", self.reference.average_number_jobs),
        ];
        for (name, interval) in intervals {
            if let Some(interval) = interval {
                if interval.lower.is_nan() || interval.upper.is_nan() || interval.lower > interval.upper {
                    return Err(SimulationError::InvalidConfig(format!(
                        "reference interval for {} is empty: [{}, {}]",
                        name, interval.lower, interval.upper
                    )));
                }
            }
        }

        Ok(())
    }

    /// Deterministic SHA-256 fingerprint of this configuration
    ///
    /// Object keys are sorted before hashing so the result only depends on
    /// the values.
    pub fn fingerprint(&self) -> Result<String, SimulationError> {
        use serde_json::Value;
        use std::collections::BTreeMap;

        let value = serde_json::to_value(self).map_err(|e| {
            SimulationError::InvalidConfig(format!("Config serialization failed: {}", e))
        })?;

        fn canonicalize(value: Value) -> Value {
            match value {
                Value::Object(map) => {
                    let sorted: BTreeMap<String, Value> =
                        map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                    Value::Object(sorted.into_iter().collect())
                }
                Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
                other => other,
            }
        }

        let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
            SimulationError::InvalidConfig(format!("Config serialization failed: {}", e))
        })?;

        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        SimulatorConfig::default().validate().unwrap();
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let a = SimulatorConfig::default().fingerprint().unwrap();
        let b = SimulatorConfig::default().fingerprint().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_fingerprint_changes_with_config() {
        let base = SimulatorConfig::default();
        let changed = SimulatorConfig {
            stage3_capacity: 1,
            ..base.clone()
        };
        assert_ne!(base.fingerprint().unwrap(), changed.fingerprint().unwrap());
    }

    #[test]
    fn test_inverted_interval_rejected() {
        let mut config = SimulatorConfig::default();
        config.reference.average_time = Some(ReferenceInterval::new(5.0, 1.0));
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidConfig(_))
        ));
    }
}
