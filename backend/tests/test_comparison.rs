//! Policy versus baseline comparison runs

use maintenance_simulator_core_rs::orchestrator::compare_fleets;
use maintenance_simulator_core_rs::predictor::{MachineFeatures, RiskPredictor};
use maintenance_simulator_core_rs::{
    run_comparison, DecisionSource, FleetConfig, FleetSnapshot, Machine, OptimizerConfig, PolicyMode,
    ScenarioConfig, SimulationConfig,
};
use std::sync::Arc;

struct NeverFlag;

impl RiskPredictor for NeverFlag {
    fn predict(&self, _features: &MachineFeatures) -> Option<bool> {
        Some(false)
    }
}

fn scenario() -> ScenarioConfig {
    ScenarioConfig {
        fleet: FleetConfig {
            machine_count: 3,
            ..Default::default()
        },
        simulation: SimulationConfig {
            total_days: 40,
            warmup_days: 20,
            rng_seed: 1234,
            optimizer: OptimizerConfig {
                population_size: 8,
                generations: 3,
                rollouts: 2,
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn test_both_runs_cover_all_days() {
    let outcome = run_comparison(&scenario(), Arc::new(NeverFlag)).unwrap();

    assert_eq!(outcome.policy.mode, PolicyMode::Optimized);
    assert_eq!(outcome.baseline.mode, PolicyMode::Baseline);
    assert_eq!(outcome.policy.records.len(), 40);
    assert_eq!(outcome.baseline.records.len(), 40);
    assert_eq!(
        outcome.profit_advantage(),
        outcome.policy.total_profit - outcome.baseline.total_profit
    );
}

#[test]
fn test_warmup_identical_across_runs() {
    let outcome = run_comparison(&scenario(), Arc::new(NeverFlag)).unwrap();

    assert_eq!(outcome.policy.records[..20], outcome.baseline.records[..20]);
    assert_eq!(outcome.policy.training_samples, outcome.baseline.training_samples);
    assert!(outcome.policy.records[20..]
        .iter()
        .all(|r| matches!(r.source(), DecisionSource::Optimized { .. })));
    assert!(outcome.baseline.records[20..]
        .iter()
        .all(|r| r.source() == DecisionSource::Baseline));
}

#[test]
fn test_comparison_reproducible() {
    let a = run_comparison(&scenario(), Arc::new(NeverFlag)).unwrap();
    let b = run_comparison(&scenario(), Arc::new(NeverFlag)).unwrap();
    assert_eq!(a.initial_fingerprint, b.initial_fingerprint);
    assert_eq!(a.policy.total_profit, b.policy.total_profit);
    assert_eq!(a.baseline.records, b.baseline.records);
}

#[test]
fn test_caller_fleet_is_fingerprinted() {
    let fleet = vec![Machine::new(0, 50.0, 200.0), Machine::new(1, 25.0, 350.0)];
    let expected = FleetSnapshot::capture(0, &fleet).unwrap().fingerprint;

    let outcome = compare_fleets(&scenario().simulation, fleet, Arc::new(NeverFlag)).unwrap();
    assert_eq!(outcome.initial_fingerprint, expected);
    assert_eq!(outcome.policy.machines.len(), 2);
    assert_eq!(outcome.baseline.machines.len(), 2);
}

#[test]
fn test_invalid_scenario_rejected() {
    let mut bad = scenario();
    bad.simulation.optimizer.population_size = 1;
    assert!(run_comparison(&bad, Arc::new(NeverFlag)).is_err());
}
