//! Fitness evaluation
//!
//! A strategy's fitness is the arithmetic mean, over `R` independent
//! rollouts, of the fleet's shaped profit for one day:
//!
//! ```text
//! rollout  = Σ_machines ( FailureModel::sample(machine, gene).profit_delta
//!                         + shaping(gene, risk_signal) )
//! fitness  = (1/R) Σ_rollouts rollout
//! ```
//!
//! Rollouts run against a read-only fleet snapshot; nothing here mutates a
//! machine. Each strategy gets its own RNG forked from the optimizer stream
//! in population order, so a generation evaluated on several worker threads
//! scores exactly as it would sequentially.

use crate::config::ConfigError;
use crate::failure::FailureModel;
use crate::models::{Decision, Machine, Strategy};
use crate::predictor::RiskSignals;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// Deterministic adjustment applied where the risk signal recommends a stand-down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapingConfig {
    /// Subtracted when a flagged machine is operated
    pub operate_against_risk_penalty: f64,
    /// Fraction of the machine's daily profit added when a flagged machine is stood down
    pub stand_down_bonus_fraction: f64,
}

impl Default for ShapingConfig {
    fn default() -> Self {
        Self {
            // Half the default major-failure repair cost
            operate_against_risk_penalty: 4_000.0,
            stand_down_bonus_fraction: 0.5,
        }
    }
}

impl ShapingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("operate_against_risk_penalty", self.operate_against_risk_penalty),
            ("stand_down_bonus_fraction", self.stand_down_bonus_fraction),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeValue { field, value });
            }
        }
        Ok(())
    }

    /// Shaping term for one machine's decision
    ///
    /// Zero when the machine is not flagged.
    pub fn adjustment(&self, machine: &Machine, decision: Decision, flagged: bool) -> f64 {
        match (flagged, decision) {
            (false, _) => 0.0,
            (true, Decision::Operate) => -self.operate_against_risk_penalty,
            (true, Decision::StandDown) => {
                self.stand_down_bonus_fraction * machine.daily_operating_profit()
            }
        }
    }
}

/// Scores strategies against one day's fleet snapshot and risk signals
pub struct FitnessEvaluator<'a> {
    model: &'a FailureModel,
    machines: &'a [Machine],
    signals: &'a RiskSignals,
    shaping: &'a ShapingConfig,
    rollouts: usize,
}

impl<'a> FitnessEvaluator<'a> {
    /// # Panics
    /// Panics if `signals` does not cover exactly the fleet or `rollouts` is zero.
    pub fn new(
        model: &'a FailureModel,
        machines: &'a [Machine],
        signals: &'a RiskSignals,
        shaping: &'a ShapingConfig,
        rollouts: usize,
    ) -> Self {
        assert_eq!(
            signals.len(),
            machines.len(),
            "risk signals must cover every machine in the fleet"
        );
        assert!(rollouts >= 1, "rollouts must be at least 1");
        Self {
            model,
            machines,
            signals,
            shaping,
            rollouts,
        }
    }

    /// One stochastic day for the whole fleet, shaped
    pub fn rollout(&self, strategy: &Strategy, rng: &mut RngManager) -> f64 {
        self.machines
            .iter()
            .map(|machine| {
                let decision = strategy.decision(machine.id());
                let outcome = self.model.sample(machine, decision, rng);
                let flagged = self.signals.recommends_stand_down(machine.id());
                outcome.profit_delta + self.shaping.adjustment(machine, decision, flagged)
            })
            .sum()
    }

    /// Mean of `R` rollouts
    ///
    /// # Panics
    /// Panics if the strategy's gene count differs from the fleet size.
    pub fn evaluate(&self, strategy: &Strategy, rng: &mut RngManager) -> f64 {
        assert_eq!(
            strategy.len(),
            self.machines.len(),
            "strategy gene count must match fleet size"
        );
        let total: f64 = (0..self.rollouts).map(|_| self.rollout(strategy, rng)).sum();
        total / self.rollouts as f64
    }

    /// Score every strategy and cache the result on it
    ///
    /// With `workers > 1` the population is split into contiguous chunks
    /// evaluated on scoped threads; the call returns only after every chunk
    /// has finished.
    pub fn evaluate_population(&self, population: &mut [Strategy], rng: &mut RngManager, workers: usize) {
        let mut streams: Vec<RngManager> = population.iter().map(|_| rng.fork()).collect();

        if workers <= 1 || population.len() < 2 {
            for (strategy, stream) in population.iter_mut().zip(streams.iter_mut()) {
                let fitness = self.evaluate(strategy, stream);
                strategy.set_fitness(fitness);
            }
            return;
        }

        let chunk_size = population.len().div_ceil(workers);
        std::thread::scope(|scope| {
            for (strategies, chunk_streams) in population
                .chunks_mut(chunk_size)
                .zip(streams.chunks_mut(chunk_size))
            {
                scope.spawn(move || {
                    for (strategy, stream) in strategies.iter_mut().zip(chunk_streams.iter_mut()) {
                        let fitness = self.evaluate(strategy, stream);
                        strategy.set_fitness(fitness);
                    }
                });
            }
        });
    }
}
