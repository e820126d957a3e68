//! Replication and experiment tests
//!
//! Covers the reference parameterization (scenario B), seed bookkeeping,
//! and agreement between sequential and parallel execution.

use tandem_simulator_core_rs::{
    run_parallel, ReferenceBounds, ReferenceInterval, SimulationError, Simulator, SimulatorConfig,
};

fn small_experiment(seed: u64) -> SimulatorConfig {
    SimulatorConfig {
        replications: 6,
        warmup_jobs: 200,
        measured_jobs: 1_000,
        rng_seed: Some(seed),
        ..SimulatorConfig::default()
    }
}

// ============================================================================
// Scenario B: reference parameterization
// ============================================================================

#[test]
fn test_scenario_b_utilizations_within_reference_bounds() {
    let config = SimulatorConfig {
        rng_seed: Some(319_412_203),
        ..SimulatorConfig::default()
    };
    let result = run_parallel(&config).unwrap();
    let summary = &result.summary;

    assert_eq!(summary.replications, 30);
    assert_eq!(result.reports.len(), 30);
    for report in &result.reports {
        assert_eq!(report.completed_jobs, 10_000);
    }

    for (name, stat) in [
        ("stage 1", &summary.stage1_utilization),
        ("stage 2", &summary.stage2_utilization),
        ("stage 3", &summary.stage3_utilization),
    ] {
        let bounds = stat.bounds.unwrap();
        assert!(
            !stat.out_of_bounds,
            "{} utilization {} outside [{}, {}]",
            name,
            stat.mean,
            bounds.lower,
            bounds.upper
        );
    }
    assert!(summary.all_within_bounds());
    assert!(summary.mean_shed_jobs > 0.0);
}

#[test]
fn test_out_of_bounds_flagged_when_interval_excludes_mean() {
    let config = SimulatorConfig {
        reference: ReferenceBounds {
            average_time: Some(ReferenceInterval::new(0.0, 1.0)),
            ..ReferenceBounds::none()
        },
        ..small_experiment(5)
    };
    let result = Simulator::new(config).unwrap().run_experiment().unwrap();

    assert!(result.summary.average_time.out_of_bounds);
    assert!(!result.summary.stage1_utilization.out_of_bounds);
    assert!(!result.summary.all_within_bounds());
}

// ============================================================================
// Seeds and reproducibility
// ============================================================================

#[test]
fn test_seeds_recorded_per_replication() {
    let mut sim = Simulator::new(small_experiment(17)).unwrap();
    let result = sim.run_experiment().unwrap();

    assert_eq!(result.replication_seeds.len(), 6);
    assert_eq!(sim.replication_seeds(), result.replication_seeds.as_slice());

    let mut distinct = result.replication_seeds.clone();
    distinct.sort_unstable();
    distinct.dedup();
    assert_eq!(distinct.len(), 6, "replication seeds must differ");

    // Replications differ from one another
    assert_ne!(result.reports[0], result.reports[1]);
}

#[test]
fn test_single_replication_replays_from_recorded_seed() {
    let config = small_experiment(23);
    let result = Simulator::new(config.clone()).unwrap().run_experiment().unwrap();

    let mut replay = Simulator::new(config.clone()).unwrap();
    let report = replay
        .run_replication(3, result.replication_seeds[3], config.warmup_jobs, config.measured_jobs)
        .unwrap();
    assert_eq!(report, result.reports[3]);
}

#[test]
fn test_summary_recomputes_from_reports() {
    let mut sim = Simulator::new(small_experiment(31)).unwrap();
    let result = sim.run_experiment().unwrap();

    let summary = sim.summarize(&result.reports).unwrap();
    assert_eq!(summary, result.summary);

    let averages = summary.averages();
    let n = result.reports.len() as f64;
    let stage2: f64 = result
        .reports
        .iter()
        .map(|r| r.stage2_utilization().unwrap())
        .sum::<f64>()
        / n;
    assert!((averages.stage2_utilization - stage2).abs() < 1e-12);
    assert_eq!(averages.average_time, summary.average_time.mean);
}

#[test]
fn test_same_master_seed_same_experiment() {
    let a = Simulator::new(small_experiment(99)).unwrap().run_experiment().unwrap();
    let b = Simulator::new(small_experiment(99)).unwrap().run_experiment().unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_parallel_matches_sequential() {
    let config = small_experiment(2024);
    let sequential = Simulator::new(config.clone()).unwrap().run_experiment().unwrap();
    let parallel = run_parallel(&config).unwrap();

    assert_eq!(sequential.replication_seeds, parallel.replication_seeds);
    assert_eq!(sequential.reports, parallel.reports);
    assert_eq!(sequential.summary, parallel.summary);
    assert_eq!(sequential.config_fingerprint, parallel.config_fingerprint);
}

#[test]
fn test_entropy_seeded_experiment_runs() {
    let config = SimulatorConfig {
        rng_seed: None,
        ..small_experiment(0)
    };
    let result = run_parallel(&config).unwrap();
    assert_eq!(result.reports.len(), 6);
    assert!(result.summary.stage1_utilization.mean > 0.0);
}

#[test]
fn test_parallel_rejects_invalid_config() {
    let config = SimulatorConfig {
        replications: 0,
        ..small_experiment(1)
    };
    assert!(matches!(
        run_parallel(&config),
        Err(SimulationError::InvalidConfig(_))
    ));
}
