//! Failure model: hazard curve, severity mix, and validation

use maintenance_simulator_core_rs::failure::{SeverityTable, WEIGHT_SUM_TOLERANCE};
use maintenance_simulator_core_rs::{
    ConfigError, Decision, EventKind, FailureModel, FailureModelConfig, Machine, RngManager,
};

#[test]
fn test_probability_grows_with_age_and_caps() {
    let model = FailureModel::new(FailureModelConfig::default()).unwrap();
    assert!((model.failure_probability(0) - 0.01).abs() < 1e-12);
    assert!((model.failure_probability(40) - 0.03).abs() < 1e-12);
    assert!((model.failure_probability(80) - 0.05).abs() < 1e-12);
    assert!((model.failure_probability(10_000) - 0.05).abs() < 1e-12);
}

#[test]
fn test_sample_does_not_mutate() {
    let model = FailureModel::new(FailureModelConfig::default()).unwrap();
    let machine = Machine::new(0, 50.0, 200.0);
    let mut rng = RngManager::new(5);
    for _ in 0..100 {
        model.sample(&machine, Decision::Operate, &mut rng);
    }
    assert_eq!(machine, Machine::new(0, 50.0, 200.0));
}

#[test]
fn test_stand_down_consumes_no_draws() {
    let model = FailureModel::new(FailureModelConfig::default()).unwrap();
    let machine = Machine::new(0, 50.0, 200.0);
    let mut rng = RngManager::new(5);
    let before = rng.get_state();
    model.sample(&machine, Decision::StandDown, &mut rng);
    assert_eq!(rng.get_state(), before);
}

#[test]
fn test_empirical_failure_rate_and_severity_mix() {
    let config = FailureModelConfig {
        base_fail_rate: 0.2,
        age_fail_factor: 0.0,
        max_fail_rate: 0.2,
        ..Default::default()
    };
    let model = FailureModel::new(config).unwrap();
    let machine = Machine::new(0, 50.0, 200.0);
    let mut rng = RngManager::new(77);

    let trials = 200_000;
    let mut failures = 0usize;
    let mut minor = 0usize;
    for _ in 0..trials {
        let outcome = model.sample(&machine, Decision::Operate, &mut rng);
        if outcome.failed() {
            failures += 1;
            if outcome.kind == EventKind::MinorFailure {
                minor += 1;
            }
        }
    }

    let rate = failures as f64 / trials as f64;
    assert!((rate - 0.2).abs() < 0.005, "failure rate {}", rate);
    let minor_share = minor as f64 / failures as f64;
    assert!((minor_share - 0.6).abs() < 0.01, "minor share {}", minor_share);
}

#[test]
fn test_expected_repair_cost() {
    assert!((SeverityTable::default().expected_repair_cost() - 6_100.0).abs() < 1e-9);
}

#[test]
fn test_weights_must_sum_to_one() {
    let mut config = FailureModelConfig::default();
    config.severities.minor.weight = 0.5;
    assert!(matches!(
        FailureModel::new(config),
        Err(ConfigError::SeverityWeights { .. })
    ));

    config.severities.minor.weight = 0.6 + WEIGHT_SUM_TOLERANCE / 10.0;
    assert!(FailureModel::new(config).is_ok());
}

#[test]
fn test_rejects_bad_constants() {
    let bad_rate = FailureModelConfig {
        base_fail_rate: 1.5,
        ..Default::default()
    };
    assert!(matches!(
        bad_rate.validate(),
        Err(ConfigError::ProbabilityOutOfRange { field: "base_fail_rate", .. })
    ));

    let mut bad_cost = FailureModelConfig::default();
    bad_cost.severities.major.repair_cost = -1.0;
    assert!(matches!(
        bad_cost.validate(),
        Err(ConfigError::NegativeValue { field: "repair_cost", .. })
    ));

    let bad_factor = FailureModelConfig {
        age_fail_factor: -0.1,
        ..Default::default()
    };
    assert!(matches!(
        bad_factor.validate(),
        Err(ConfigError::NegativeValue { field: "age_fail_factor", .. })
    ));
}
