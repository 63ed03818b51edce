//! Policy versus baseline comparison
//!
//! Both runs start from deep copies of one fleet and share the seed, so the
//! warm-up days are identical and any profit difference comes from the
//! post-warm-up decisions. The two engines own disjoint state and run on
//! separate threads.

use crate::config::ScenarioConfig;
use crate::models::Machine;
use crate::orchestrator::checkpoint::FleetSnapshot;
use crate::orchestrator::engine::{RunOutcome, SimulationConfig, SimulationEngine, SimulationError};
use crate::policy::PolicyMode;
use crate::predictor::RiskPredictor;
use crate::rng::RngManager;
use std::sync::Arc;
use tracing::info;

/// Results of a policy run and a baseline run over the same fleet
#[derive(Debug, Clone)]
pub struct ComparisonOutcome {
    /// Fingerprint of the shared initial fleet
    pub initial_fingerprint: String,
    pub policy: RunOutcome,
    pub baseline: RunOutcome,
}

impl ComparisonOutcome {
    /// Policy total profit minus baseline total profit
    pub fn profit_advantage(&self) -> f64 {
        self.policy.total_profit - self.baseline.total_profit
    }
}

/// Generate the scenario's fleet and compare policy against baseline
///
/// The fleet is drawn from a stream forked off the simulation seed, so the
/// engines' own streams start untouched.
pub fn run_comparison(
    scenario: &ScenarioConfig,
    predictor: Arc<dyn RiskPredictor>,
) -> Result<ComparisonOutcome, SimulationError> {
    scenario.validate()?;
    let mut fleet_rng = RngManager::new(scenario.simulation.rng_seed).fork();
    let fleet = scenario.fleet.generate(&mut fleet_rng)?;
    compare_fleets(&scenario.simulation, fleet, predictor)
}

/// Compare policy against baseline on a caller-supplied fleet
pub fn compare_fleets(
    config: &SimulationConfig,
    fleet: Vec<Machine>,
    predictor: Arc<dyn RiskPredictor>,
) -> Result<ComparisonOutcome, SimulationError> {
    let initial = FleetSnapshot::capture(0, &fleet)?;

    let policy_config = SimulationConfig {
        policy: PolicyMode::Optimized,
        ..config.clone()
    };
    let baseline_config = SimulationConfig {
        policy: PolicyMode::Baseline,
        ..config.clone()
    };

    let policy_engine = SimulationEngine::new(policy_config, initial.restore(), Some(predictor))?;
    let baseline_engine = SimulationEngine::new(baseline_config, fleet, None)?;

    for engine in [&policy_engine, &baseline_engine] {
        let found = engine.snapshot()?.fingerprint;
        if found != initial.fingerprint {
            return Err(SimulationError::SnapshotMismatch {
                expected: initial.fingerprint.clone(),
                found,
            });
        }
    }

    info!(
        machines = initial.machine_count(),
        days = config.total_days,
        warmup = config.warmup_days,
        seed = config.rng_seed,
        "starting comparison"
    );

    let (policy, baseline) = std::thread::scope(|scope| {
        let policy = scope.spawn(move || policy_engine.run_to_completion());
        let baseline = baseline_engine.run_to_completion();
        match policy.join() {
            Ok(policy) => (policy, baseline),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    });

    let outcome = ComparisonOutcome {
        initial_fingerprint: initial.fingerprint,
        policy: policy?,
        baseline: baseline?,
    };
    info!(
        policy_profit = outcome.policy.total_profit,
        baseline_profit = outcome.baseline.total_profit,
        advantage = outcome.profit_advantage(),
        "comparison complete"
    );
    Ok(outcome)
}
