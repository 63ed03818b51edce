//! Simulation Engine
//!
//! Main day loop integrating all simulation components:
//! - Phase selection (warm-up, policy-driven, baseline, terminal)
//! - Strategy choice (baseline or genetic search)
//! - Failure model transition for every machine
//! - Day record logging (complete simulation history)
//! - Training corpus collection during warm-up
//!
//! # Architecture
//!
//! ```text
//! For each day d:
//! 1. Resolve phase from d, the warm-up threshold and the policy mode
//! 2. Choose the day strategy
//!      warm-up / baseline → operate everything
//!      policy-driven      → risk signals once per machine, genetic search
//! 3. Apply the failure model to every machine in id order
//! 4. Accumulate per-machine and fleet profit
//! 5. Append one immutable DayRecord
//! 6. Advance time
//! ```
//!
//! # Example
//!
//! ```rust
//! use maintenance_simulator_core_rs::orchestrator::{SimulationConfig, SimulationEngine};
//! use maintenance_simulator_core_rs::policy::PolicyMode;
//! use maintenance_simulator_core_rs::Machine;
//!
//! let config = SimulationConfig {
//!     total_days: 30,
//!     warmup_days: 30,
//!     policy: PolicyMode::Baseline,
//!     ..Default::default()
//! };
//! let fleet = vec![Machine::new(0, 50.0, 200.0), Machine::new(1, 30.0, 250.0)];
//!
//! let mut engine = SimulationEngine::new(config, fleet, None).unwrap();
//! engine.run().unwrap();
//! assert_eq!(engine.day_log().len(), 30);
//! ```

use crate::config::ConfigError;
use crate::core::time::{SimulationPhase, TimeManager};
use crate::failure::{FailureModel, FailureModelConfig};
use crate::models::{validate_fleet, DayLog, DayRecord, EventKind, Machine, MachineEvent, MachineId};
use crate::optimizer::{GeneticOptimizer, OptimizerConfig, OptimizerError};
use crate::orchestrator::checkpoint::FleetSnapshot;
use crate::policy::{DayStrategy, PolicyMode};
use crate::predictor::{MachineFeatures, RiskPredictor, TrainingSample};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of days to simulate
    pub total_days: usize,

    /// Days of operate-everything warm-up before the policy may act
    pub warmup_days: usize,

    /// RNG seed for deterministic simulation
    pub rng_seed: u64,

    /// Post-warm-up policy
    pub policy: PolicyMode,

    /// Record (features, failed) samples during warm-up
    pub collect_training_samples: bool,

    pub failure: FailureModelConfig,

    pub optimizer: OptimizerConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            total_days: 3650,
            warmup_days: 365,
            rng_seed: 42,
            policy: PolicyMode::Optimized,
            collect_training_samples: true,
            failure: FailureModelConfig::default(),
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_days == 0 {
            return Err(ConfigError::ZeroDays);
        }
        self.failure.validate()?;
        self.optimizer.validate()
    }
}

/// Simulation error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Optimizer(#[from] OptimizerError),

    #[error("strategy has {actual} genes but the fleet has {expected} machines")]
    StrategyLengthMismatch { expected: usize, actual: usize },

    #[error("simulation already finished after {total_days} days")]
    Finished { total_days: usize },

    #[error("fleet snapshot mismatch: expected {expected}, found {found}")]
    SnapshotMismatch { expected: String, found: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Summary of one simulated day
#[derive(Debug, Clone, PartialEq)]
pub struct DayResult {
    pub day: usize,
    pub phase: SimulationPhase,
    pub net_profit: f64,
    pub failures: usize,
    pub stood_down: usize,
    pub recovering: usize,
}

/// Everything a finished run exposes for reporting
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub mode: PolicyMode,
    pub records: Vec<DayRecord>,
    pub machines: Vec<Machine>,
    pub machine_profits: Vec<f64>,
    pub total_profit: f64,
    pub training_samples: Vec<TrainingSample>,
}

// ============================================================================
// Engine
// ============================================================================

/// Day-loop orchestrator owning one fleet
///
/// The engine exclusively owns its machines and day log. Two engines never
/// share a fleet; comparison runs hand each engine its own deep copy.
///
/// # Determinism
///
/// All randomness is via `rng` with seeded xorshift64*.
/// Same seed + same config + same fleet = identical day records.
pub struct SimulationEngine {
    config: SimulationConfig,
    machines: Vec<Machine>,
    time: TimeManager,
    rng: RngManager,
    failure_model: FailureModel,
    optimizer: Option<GeneticOptimizer>,
    predictor: Option<Arc<dyn RiskPredictor>>,
    day_log: DayLog,
    machine_profits: Vec<f64>,
    training_samples: Vec<TrainingSample>,
    last_phase: Option<SimulationPhase>,
}

impl SimulationEngine {
    /// Create a new engine from configuration and an initial fleet
    ///
    /// The optimized policy mode requires a predictor; the baseline mode
    /// ignores one if given.
    pub fn new(
        config: SimulationConfig,
        machines: Vec<Machine>,
        predictor: Option<Arc<dyn RiskPredictor>>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        validate_fleet(&machines)?;

        let failure_model = FailureModel::new(config.failure)?;
        let optimizer = if config.policy.uses_optimizer() {
            if predictor.is_none() {
                return Err(ConfigError::MissingPredictor.into());
            }
            Some(GeneticOptimizer::new(config.optimizer, failure_model.clone())?)
        } else {
            None
        };

        Ok(Self {
            time: TimeManager::new(config.total_days, config.warmup_days),
            rng: RngManager::new(config.rng_seed),
            machine_profits: vec![0.0; machines.len()],
            machines,
            failure_model,
            optimizer,
            predictor,
            day_log: DayLog::new(),
            training_samples: Vec::new(),
            last_phase: None,
            config,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Index of the next day to simulate
    pub fn current_day(&self) -> usize {
        self.time.current_day()
    }

    pub fn phase(&self) -> SimulationPhase {
        self.time.phase(self.config.policy.uses_optimizer())
    }

    pub fn is_finished(&self) -> bool {
        self.time.is_finished()
    }

    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    pub fn machine(&self, id: MachineId) -> Option<&Machine> {
        self.machines.get(id)
    }

    pub fn day_log(&self) -> &DayLog {
        &self.day_log
    }

    pub fn records(&self) -> &[DayRecord] {
        self.day_log.records()
    }

    pub fn total_profit(&self) -> f64 {
        self.machine_profits.iter().sum()
    }

    /// Accumulated net profit of one machine
    pub fn machine_profit(&self, id: MachineId) -> Option<f64> {
        self.machine_profits.get(id).copied()
    }

    /// Warm-up corpus for training an external predictor
    pub fn training_samples(&self) -> &[TrainingSample] {
        &self.training_samples
    }

    /// Current RNG state (for replay diagnostics)
    pub fn rng_state(&self) -> u64 {
        self.rng.get_state()
    }

    /// Capture the fleet with a content fingerprint
    pub fn snapshot(&self) -> Result<FleetSnapshot, SimulationError> {
        FleetSnapshot::capture(self.current_day(), &self.machines)
    }

    // ========================================================================
    // Day Loop Implementation
    // ========================================================================

    /// Choose today's strategy according to the phase
    fn choose_strategy(&mut self, phase: SimulationPhase) -> Result<DayStrategy, SimulationError> {
        match phase {
            SimulationPhase::Terminal => Err(SimulationError::Finished {
                total_days: self.time.total_days(),
            }),
            SimulationPhase::WarmUp | SimulationPhase::Baseline => Ok(DayStrategy::Baseline),
            SimulationPhase::PolicyDriven => {
                let (Some(optimizer), Some(predictor)) = (self.optimizer.as_ref(), self.predictor.as_deref())
                else {
                    return Err(ConfigError::MissingPredictor.into());
                };
                let result = optimizer.optimize(&self.machines, predictor, &mut self.rng)?;
                debug!(
                    day = self.time.current_day(),
                    fitness = result.fitness,
                    flagged = result.flagged_machines,
                    operating = result.best.operating_count(),
                    "strategy optimized"
                );
                Ok(DayStrategy::Optimized {
                    fitness: result.fitness,
                    strategy: result.best,
                })
            }
        }
    }

    /// Simulate one day with the phase-appropriate strategy
    ///
    /// # Returns
    ///
    /// * `Ok(DayResult)` - Day executed and recorded
    /// * `Err(SimulationError::Finished)` - Day budget already exhausted
    /// * `Err(SimulationError::Optimizer)` - Predictor contract violated
    pub fn step_day(&mut self) -> Result<DayResult, SimulationError> {
        let phase = self.enter_phase();
        let strategy = self.choose_strategy(phase)?;
        self.apply_day(phase, &strategy)
    }

    /// Simulate one day with a caller-supplied strategy
    ///
    /// Phase bookkeeping (training samples, terminal check) still applies.
    pub fn step_with(&mut self, strategy: DayStrategy) -> Result<DayResult, SimulationError> {
        let phase = self.enter_phase();
        if phase == SimulationPhase::Terminal {
            return Err(SimulationError::Finished {
                total_days: self.time.total_days(),
            });
        }
        self.apply_day(phase, &strategy)
    }

    /// Run until the day budget is exhausted
    pub fn run(&mut self) -> Result<(), SimulationError> {
        while !self.is_finished() {
            self.step_day()?;
        }
        Ok(())
    }

    /// Run at most `days` days, stopping early at terminal
    pub fn run_days(&mut self, days: usize) -> Result<Vec<DayResult>, SimulationError> {
        let mut results = Vec::with_capacity(days.min(self.time.remaining_days()));
        for _ in 0..days {
            if self.is_finished() {
                break;
            }
            results.push(self.step_day()?);
        }
        Ok(results)
    }

    /// Run to terminal and hand over the results
    pub fn run_to_completion(mut self) -> Result<RunOutcome, SimulationError> {
        self.run()?;
        Ok(self.into_outcome())
    }

    /// Consume the engine, exposing records and final machine states
    pub fn into_outcome(self) -> RunOutcome {
        RunOutcome {
            mode: self.config.policy,
            total_profit: self.machine_profits.iter().sum(),
            records: self.day_log.into_records(),
            machines: self.machines,
            machine_profits: self.machine_profits,
            training_samples: self.training_samples,
        }
    }

    /// Resolve today's phase, logging transitions
    fn enter_phase(&mut self) -> SimulationPhase {
        let phase = self.phase();
        if self.last_phase != Some(phase) {
            info!(
                day = self.time.current_day(),
                ?phase,
                mode = ?self.config.policy,
                "entering phase"
            );
            self.last_phase = Some(phase);
        }
        phase
    }

    fn apply_day(&mut self, phase: SimulationPhase, strategy: &DayStrategy) -> Result<DayResult, SimulationError> {
        if let Some(actual) = strategy.gene_count() {
            if actual != self.machines.len() {
                return Err(SimulationError::StrategyLengthMismatch {
                    expected: self.machines.len(),
                    actual,
                });
            }
        }

        let day = self.time.current_day();
        let collect = self.config.collect_training_samples && phase == SimulationPhase::WarmUp;
        let mut events = Vec::with_capacity(self.machines.len());

        for machine in self.machines.iter_mut() {
            let features = collect.then(|| MachineFeatures::from(&*machine));
            let decision = strategy.decision(machine.id());
            let outcome = self.failure_model.apply(machine, decision, &mut self.rng);

            self.machine_profits[machine.id()] += outcome.profit_delta;
            if let Some(features) = features {
                self.training_samples.push(TrainingSample {
                    day,
                    features,
                    failed: outcome.failed(),
                });
            }
            events.push(MachineEvent {
                machine_id: machine.id(),
                kind: outcome.kind,
                profit_delta: outcome.profit_delta,
            });
        }

        let record = DayRecord::new(day, strategy.source(), events);
        let result = DayResult {
            day,
            phase,
            net_profit: record.net_profit(),
            failures: record.failure_count(),
            stood_down: record.count_of(EventKind::PreventiveStandDown),
            recovering: record.count_of(EventKind::Recovering),
        };
        debug!(
            day,
            net_profit = result.net_profit,
            failures = result.failures,
            stood_down = result.stood_down,
            recovering = result.recovering,
            "day simulated"
        );

        self.day_log.append(record);
        self.time.advance_day();

        if self.time.is_finished() {
            info!(
                days = self.time.total_days(),
                total_profit = self.total_profit(),
                mode = ?self.config.policy,
                "simulation complete"
            );
        }

        Ok(result)
    }
}
