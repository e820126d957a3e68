//! Event loop tests
//!
//! Critical invariants tested:
//! - Determinism: same seed + config produces identical reports
//! - Time never runs backwards, for the clock or for any job
//! - Station 3 occupancy stays within [0, capacity]
//! - Completions and exits agree, and reach the target exactly
//! - Utilizations lie in [0, 1]

use std::collections::HashMap;
use tandem_simulator_core_rs::{
    GeneratorKind, JobId, SimulationReport, Simulator, SimulatorConfig, Stage, TransitionEvent,
    UniformSource,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Scenario A: single-slot third station
fn scenario_a_config() -> SimulatorConfig {
    SimulatorConfig {
        replications: 1,
        warmup_jobs: 100,
        measured_jobs: 100,
        interarrival_means: [20.0, 40.0, 12.5],
        service_means: [4.5, 5.0, 5.8],
        stage3_capacity: 1,
        rng_seed: Some(319_412_203),
        ..SimulatorConfig::default()
    }
}

fn run_with_events(config: SimulatorConfig, seed: u64, target: u64) -> (SimulationReport, Vec<TransitionEvent>) {
    let mut sim = Simulator::with_seed(config, seed).unwrap();
    let mut events = Vec::new();
    let report = sim.run_observed(target, |e| events.push(*e)).unwrap();
    (report, events)
}

// ============================================================================
// Scenario A
// ============================================================================

#[test]
fn test_scenario_a_is_reproducible() {
    let mut first = Simulator::with_seed(scenario_a_config(), 31_337).unwrap();
    let mut second = Simulator::with_seed(scenario_a_config(), 31_337).unwrap();

    let a = first.run(100).unwrap();
    let b = second.run(100).unwrap();

    assert_eq!(a, b, "same seed must give bit-identical reports");
    assert_eq!(a.statistics().unwrap(), b.statistics().unwrap());
}

#[test]
fn test_scenario_a_sheds_with_single_slot() {
    let (report, events) = run_with_events(scenario_a_config(), 31_337, 100);

    assert_eq!(report.completed_jobs, 100);
    assert_eq!(report.peak_stage3_occupancy, 1);
    assert!(report.shed_jobs > 0, "a one-slot station 3 must turn jobs away");

    let shed = events.iter().filter(|e| e.is_shed()).count() as u64;
    assert_eq!(shed, report.shed_jobs);
}

#[test]
fn test_reseed_replays_run() {
    let mut sim = Simulator::with_seed(scenario_a_config(), 1).unwrap();
    sim.reseed(99);
    let a = sim.run(100).unwrap();
    sim.reseed(99);
    let b = sim.run(100).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_different_seeds_give_different_runs() {
    let (a, _) = run_with_events(scenario_a_config(), 1, 100);
    let (b, _) = run_with_events(scenario_a_config(), 2, 100);
    assert_ne!(a.clock, b.clock);
}

// ============================================================================
// Invariants along the event trace
// ============================================================================

#[test]
fn test_clock_and_job_due_times_never_go_backwards() {
    let (_, events) = run_with_events(SimulatorConfig::default(), 4242, 2_000);

    let mut last_clock = 0.0;
    let mut last_due: HashMap<JobId, f64> = HashMap::new();
    for event in &events {
        assert!(event.clock >= last_clock, "clock moved back at {:?}", event);
        last_clock = event.clock;

        if let Some(prev) = last_due.insert(event.job_id, event.due_time) {
            assert!(
                event.due_time >= prev,
                "{} moved back from {} to {}",
                event.job_id,
                prev,
                event.due_time
            );
        }
        assert!(event.due_time >= event.clock);
    }
}

#[test]
fn test_stage3_occupancy_bounded_by_capacity() {
    for capacity in [1, 2, 10] {
        let config = SimulatorConfig {
            stage3_capacity: capacity,
            ..scenario_a_config()
        };
        let (report, events) = run_with_events(config, 77, 1_000);

        assert!(events.iter().all(|e| e.stage3_occupancy <= capacity));
        assert!(report.peak_stage3_occupancy <= capacity);
        // Every admitted job has left by the end of a drained run
        assert_eq!(events.last().map(|e| e.stage3_occupancy), Some(0));
    }
}

#[test]
fn test_completions_match_exits() {
    let (report, events) = run_with_events(SimulatorConfig::default(), 5, 1_500);

    let exits = events.iter().filter(|e| e.is_exit()).count() as u64;
    assert_eq!(exits, report.completed_jobs);
    assert_eq!(report.completed_jobs, 1_500);
    assert_eq!(report.jobs_created, 1_500);
    assert_eq!(report.events_processed, events.len() as u64);
    assert_eq!(events.last().map(|e| e.live_jobs), Some(0));
}

#[test]
fn test_stages_visited_in_order() {
    let (_, events) = run_with_events(SimulatorConfig::default(), 11, 300);

    for event in &events {
        let expected = match event.from {
            Stage::Initialized => vec![Stage::Stage1],
            Stage::Stage1 => vec![Stage::Stage2],
            Stage::Stage2 => vec![Stage::Stage2Done],
            Stage::Stage2Done => vec![Stage::Stage3, Stage::Terminal],
            Stage::Stage3 => vec![Stage::Terminal],
            Stage::Terminal => vec![],
        };
        assert!(expected.contains(&event.to), "illegal transition {:?}", event);
    }
}

#[test]
fn test_utilizations_within_unit_interval() {
    for (seed, capacity) in [(1, 1), (2, 5), (3, 10), (4, 100)] {
        let config = SimulatorConfig {
            stage3_capacity: capacity,
            ..SimulatorConfig::default()
        };
        let (report, _) = run_with_events(config, seed, 1_000);
        let stats = report.statistics().unwrap();
        for util in [
            stats.stage1_utilization,
            stats.stage2_utilization,
            stats.stage3_utilization,
        ] {
            assert!((0.0..=1.0).contains(&util), "utilization {} outside [0, 1]", util);
        }
    }
}

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_area_equals_total_sojourn_without_shedding() {
    // With no shedding every job leaves through station 3, so the
    // integral of the population equals the summed time in system.
    let config = SimulatorConfig {
        stage3_capacity: 10_000,
        ..SimulatorConfig::default()
    };
    let (report, _) = run_with_events(config, 8, 2_000);

    assert_eq!(report.shed_jobs, 0);
    let diff = (report.area_under_job_count - report.sojourn_history).abs();
    assert!(
        diff <= 1e-9 * report.sojourn_history,
        "area {} vs sojourn {}",
        report.area_under_job_count,
        report.sojourn_history
    );
}

#[test]
fn test_shedding_lowers_stage3_load() {
    let tight = SimulatorConfig {
        stage3_capacity: 1,
        ..SimulatorConfig::default()
    };
    let loose = SimulatorConfig {
        stage3_capacity: 10_000,
        ..SimulatorConfig::default()
    };
    let (tight_report, _) = run_with_events(tight, 21, 3_000);
    let (loose_report, _) = run_with_events(loose, 21, 3_000);

    assert!(tight_report.shed_jobs > loose_report.shed_jobs);
    assert!(
        tight_report.stage3_utilization().unwrap() < loose_report.stage3_utilization().unwrap()
    );
}

#[test]
fn test_zero_target_reports_insufficient_data() {
    let mut sim = Simulator::with_seed(SimulatorConfig::default(), 3).unwrap();
    let report = sim.run(0).unwrap();
    assert!(report.is_insufficient());
    assert!(report.statistics().is_err());
    assert_eq!(report.jobs_created, 0);
}

#[test]
fn test_lehmer_generator_runs_and_replays() {
    let config = SimulatorConfig {
        generator: GeneratorKind::Lehmer,
        ..scenario_a_config()
    };
    let (a, _) = run_with_events(config.clone(), 319_412_203_455_463_900, 500);
    let (b, _) = run_with_events(config, 319_412_203_455_463_900, 500);
    assert_eq!(a, b);
    assert_eq!(a.completed_jobs, 500);
}

#[test]
fn test_small_target_stops_before_draining() {
    // Three seed jobs are always created, even for a target below three
    let (report, _) = run_with_events(SimulatorConfig::default(), 13, 1);
    assert_eq!(report.jobs_created, 3);
    assert_eq!(report.completed_jobs, 1);
}

#[test]
fn test_small_target_counts_only_finished_service() {
    // Runs stopping with jobs still in service must not credit work
    // scheduled past the final clock.
    for target in [1, 2] {
        for seed in 0..500 {
            let (report, _) = run_with_events(SimulatorConfig::default(), seed, target);
            let stats = report.statistics().unwrap();
            for util in [
                stats.stage1_utilization,
                stats.stage2_utilization,
                stats.stage3_utilization,
            ] {
                assert!(
                    (0.0..=1.0).contains(&util),
                    "seed {} target {}: utilization {}",
                    seed,
                    target,
                    util
                );
            }
            for station in &report.stations {
                assert!(station.busy_until() <= report.clock);
            }
        }
    }
}

#[test]
fn test_rng_state_tracks_reseed() {
    let mut sim = Simulator::with_seed(scenario_a_config(), 1).unwrap();
    sim.run(50).unwrap();
    sim.reseed(4_242);
    assert_eq!(sim.rng_state(), GeneratorKind::Xorshift.build(4_242).state());
}
