//! Policy Optimizer
//!
//! Evolutionary search for the day's operate/stand-down vector.
//!
//! # Algorithm
//!
//! ```text
//! signals    ← predictor(machine) for every machine   (once per day)
//! population ← P strategies with random genes
//! repeat G times:
//!     evaluate every strategy (mean of R shaped rollouts)
//!     stable-sort by fitness, descending; keep top ⌊P/2⌋ as elites
//!     refill to P: two distinct elites → single-point crossover → mutate
//! re-evaluate every strategy with fresh rollouts
//! return the strategy with the highest fresh fitness (first on ties)
//! ```
//!
//! Elites survive unmodified but are re-scored every generation, and the
//! final re-evaluation keeps a lucky cached score from deciding the winner.
//!
//! # Example
//!
//! ```rust
//! use maintenance_simulator_core_rs::failure::{FailureModel, FailureModelConfig};
//! use maintenance_simulator_core_rs::optimizer::{GeneticOptimizer, OptimizerConfig};
//! use maintenance_simulator_core_rs::predictor::RiskSignals;
//! use maintenance_simulator_core_rs::{Machine, RngManager};
//!
//! let model = FailureModel::new(FailureModelConfig::default()).unwrap();
//! let config = OptimizerConfig { population_size: 10, generations: 5, ..Default::default() };
//! let optimizer = GeneticOptimizer::new(config, model).unwrap();
//!
//! let fleet = vec![Machine::new(0, 50.0, 200.0), Machine::new(1, 40.0, 300.0)];
//! let signals = RiskSignals::quiet(fleet.len());
//! let result = optimizer.optimize_with_signals(&fleet, &signals, &mut RngManager::new(7));
//! assert_eq!(result.best.len(), 2);
//! ```

pub mod fitness;

use crate::config::ConfigError;
use crate::failure::FailureModel;
use crate::models::{Machine, MachineId, Strategy};
use crate::predictor::{RiskPredictor, RiskSignals};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use fitness::{FitnessEvaluator, ShapingConfig};

/// Errors raised while optimizing a day
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OptimizerError {
    #[error("risk predictor returned no signal for machine {machine_id}")]
    MissingRiskSignal { machine_id: MachineId },
}

/// Genetic search parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Strategies per generation (`P`)
    pub population_size: usize,
    /// Generations per day (`G`)
    pub generations: usize,
    /// Per-gene flip probability (`M`)
    pub mutation_rate: f64,
    /// Rollouts averaged per fitness evaluation (`R`)
    pub rollouts: usize,
    /// Threads used to evaluate a generation
    pub workers: usize,
    pub shaping: ShapingConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 50,
            mutation_rate: 0.2,
            rollouts: 10,
            workers: 1,
            shaping: ShapingConfig::default(),
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::ProbabilityOutOfRange {
                field: "mutation_rate",
                value: self.mutation_rate,
            });
        }
        if self.rollouts < 1 {
            return Err(ConfigError::NoRollouts);
        }
        if self.workers < 1 {
            return Err(ConfigError::NoWorkers);
        }
        self.shaping.validate()
    }

    /// Number of strategies retained per generation
    pub fn elite_count(&self) -> usize {
        self.population_size / 2
    }
}

/// Fitness statistics of one evaluated generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
}

/// Outcome of one day's search
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Winning strategy, fitness cached from the final re-evaluation
    pub best: Strategy,
    /// Fresh fitness of `best`
    pub fitness: f64,
    /// Machines the predictor flagged for stand-down
    pub flagged_machines: usize,
    /// Per-generation statistics (empty when `G = 0`)
    pub history: Vec<GenerationStats>,
    /// Final population with fresh fitness, in population order
    pub final_population: Vec<Strategy>,
}

/// Population-based day-strategy search
#[derive(Debug, Clone)]
pub struct GeneticOptimizer {
    config: OptimizerConfig,
    model: FailureModel,
}

impl GeneticOptimizer {
    pub fn new(config: OptimizerConfig, model: FailureModel) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, model })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Query the predictor once per machine, then search
    pub fn optimize(
        &self,
        machines: &[Machine],
        predictor: &dyn RiskPredictor,
        rng: &mut RngManager,
    ) -> Result<OptimizationResult, OptimizerError> {
        let signals = RiskSignals::collect(predictor, machines)?;
        Ok(self.optimize_with_signals(machines, &signals, rng))
    }

    /// Search with precomputed risk signals
    pub fn optimize_with_signals(
        &self,
        machines: &[Machine],
        signals: &RiskSignals,
        rng: &mut RngManager,
    ) -> OptimizationResult {
        let evaluator = FitnessEvaluator::new(
            &self.model,
            machines,
            signals,
            &self.config.shaping,
            self.config.rollouts,
        );

        let mut population = self.initial_population(machines.len(), rng);
        let mut history = Vec::with_capacity(self.config.generations);

        for generation in 0..self.config.generations {
            evaluator.evaluate_population(&mut population, rng, self.config.workers);

            let stats = generation_stats(generation, &population);
            debug!(
                generation,
                best = stats.best_fitness,
                mean = stats.mean_fitness,
                "generation evaluated"
            );
            history.push(stats);

            let (elites, _discarded) = Self::select_elites(population, self.config.elite_count());
            population = self.reproduce(elites, rng);
        }

        evaluator.evaluate_population(&mut population, rng, self.config.workers);
        let best_index = best_index(&population);
        let best = population[best_index].clone();
        let fitness = best.fitness().unwrap_or(0.0);

        OptimizationResult {
            best,
            fitness,
            flagged_machines: signals.flagged_count(),
            history,
            final_population: population,
        }
    }

    /// `P` strategies with independently random genes
    pub fn initial_population(&self, machine_count: usize, rng: &mut RngManager) -> Vec<Strategy> {
        (0..self.config.population_size)
            .map(|_| Strategy::random(machine_count, rng))
            .collect()
    }

    /// Split an evaluated population into (elites, discarded)
    ///
    /// The sort is stable, so equal fitness keeps population order.
    /// Unevaluated strategies rank last.
    pub fn select_elites(mut population: Vec<Strategy>, elite_count: usize) -> (Vec<Strategy>, Vec<Strategy>) {
        population.sort_by(|a, b| rank_key(b).total_cmp(&rank_key(a)));
        let discarded = population.split_off(elite_count.min(population.len()));
        (population, discarded)
    }

    /// Refill to `P` with mutated crossover children of distinct elite pairs
    ///
    /// Elites are carried over unchanged at the front.
    pub fn reproduce(&self, elites: Vec<Strategy>, rng: &mut RngManager) -> Vec<Strategy> {
        let target = self.config.population_size;
        let mut next = elites;
        let elite_count = next.len();
        if elite_count == 0 {
            return next;
        }

        while next.len() < target {
            let (a, b) = rng.two_distinct(elite_count);
            let mut child = Strategy::crossover(&next[a], &next[b], rng);
            child.mutate(self.config.mutation_rate, rng);
            next.push(child);
        }
        next
    }
}

fn rank_key(strategy: &Strategy) -> f64 {
    strategy.fitness().unwrap_or(f64::NEG_INFINITY)
}

/// Index of the first strategy with maximal fitness
fn best_index(population: &[Strategy]) -> usize {
    let mut best = 0;
    for (i, strategy) in population.iter().enumerate().skip(1) {
        if rank_key(strategy) > rank_key(&population[best]) {
            best = i;
        }
    }
    best
}

fn generation_stats(generation: usize, population: &[Strategy]) -> GenerationStats {
    let scores: Vec<f64> = population.iter().map(rank_key).collect();
    let best_fitness = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean_fitness = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };
    GenerationStats {
        generation,
        best_fitness,
        mean_fitness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::FailureModelConfig;

    fn scored(genes: Vec<bool>, fitness: f64) -> Strategy {
        let mut s = Strategy::from_genes(genes);
        s.set_fitness(fitness);
        s
    }

    #[test]
    fn test_config_validation() {
        let base = OptimizerConfig::default();
        assert_eq!(
            OptimizerConfig { population_size: 1, ..base }.validate(),
            Err(ConfigError::PopulationTooSmall(1))
        );
        assert!(matches!(
            OptimizerConfig { mutation_rate: 1.5, ..base }.validate(),
            Err(ConfigError::ProbabilityOutOfRange { field: "mutation_rate", .. })
        ));
        assert_eq!(
            OptimizerConfig { rollouts: 0, ..base }.validate(),
            Err(ConfigError::NoRollouts)
        );
        assert!(base.validate().is_ok());
    }

    #[test]
    fn test_select_elites_stable_on_ties() {
        let population = vec![
            scored(vec![false, false], 1.0),
            scored(vec![true, false], 5.0),
            scored(vec![false, true], 5.0),
            scored(vec![true, true], 0.0),
        ];
        let (elites, discarded) = GeneticOptimizer::select_elites(population, 2);
        assert_eq!(elites[0].genes(), &[true, false]);
        assert_eq!(elites[1].genes(), &[false, true]);
        assert_eq!(discarded.len(), 2);
    }

    #[test]
    fn test_reproduce_fills_population() {
        let model = FailureModel::new(FailureModelConfig::default()).unwrap();
        let config = OptimizerConfig {
            population_size: 7,
            ..Default::default()
        };
        let optimizer = GeneticOptimizer::new(config, model).unwrap();
        let elites = vec![scored(vec![true; 4], 2.0), scored(vec![false; 4], 1.0), scored(vec![true; 4], 0.5)];

        let next = optimizer.reproduce(elites.clone(), &mut RngManager::new(9));
        assert_eq!(next.len(), 7);
        assert_eq!(&next[..3], &elites[..], "elites carried unchanged");
        assert!(next[3..].iter().all(|s| s.len() == 4));
    }

    #[test]
    fn test_best_index_first_on_ties() {
        let population = vec![scored(vec![], 1.0), scored(vec![], 3.0), scored(vec![], 3.0)];
        assert_eq!(best_index(&population), 1);
    }
}
