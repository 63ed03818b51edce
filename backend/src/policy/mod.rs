//! Day Policy Module
//!
//! Which strategy the engine applies on a given day.
//!
//! # Overview
//!
//! Each day the engine picks one [`DayStrategy`]:
//! - **Baseline**: operate every machine (run-to-failure). Always used during
//!   warm-up, and after warm-up in runs whose [`PolicyMode`] is `Baseline`.
//! - **Optimized**: the genetic search's winner for the day.
//! - **Fixed**: a strategy supplied by the caller, for scripted days.
//!
//! The baseline is a named variant rather than a synthesized all-true gene
//! vector, so records can tell a policy-free day from an optimized one.

use crate::models::{Decision, DecisionSource, MachineId, Strategy};
use serde::{Deserialize, Serialize};

/// Post-warm-up decision policy for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Run the optimizer every post-warm-up day
    #[default]
    Optimized,
    /// Operate everything every day
    Baseline,
}

impl PolicyMode {
    pub fn uses_optimizer(self) -> bool {
        matches!(self, PolicyMode::Optimized)
    }
}

/// The strategy applied to one day
#[derive(Debug, Clone, PartialEq)]
pub enum DayStrategy {
    Baseline,
    Optimized { strategy: Strategy, fitness: f64 },
    Fixed(Strategy),
}

impl DayStrategy {
    /// Decision for one machine
    pub fn decision(&self, machine_id: MachineId) -> Decision {
        match self {
            DayStrategy::Baseline => Decision::Operate,
            DayStrategy::Optimized { strategy, .. } | DayStrategy::Fixed(strategy) => {
                strategy.decision(machine_id)
            }
        }
    }

    /// Gene count, `None` for the baseline (it fits any fleet)
    pub fn gene_count(&self) -> Option<usize> {
        match self {
            DayStrategy::Baseline => None,
            DayStrategy::Optimized { strategy, .. } | DayStrategy::Fixed(strategy) => Some(strategy.len()),
        }
    }

    /// Provenance recorded on the day
    pub fn source(&self) -> DecisionSource {
        match self {
            DayStrategy::Baseline => DecisionSource::Baseline,
            DayStrategy::Optimized { fitness, .. } => DecisionSource::Optimized { fitness: *fitness },
            DayStrategy::Fixed(_) => DecisionSource::Fixed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_operates_everything() {
        let day = DayStrategy::Baseline;
        assert_eq!(day.decision(0), Decision::Operate);
        assert_eq!(day.decision(999), Decision::Operate);
        assert_eq!(day.gene_count(), None);
        assert_eq!(day.source(), DecisionSource::Baseline);
    }

    #[test]
    fn test_optimized_source_carries_fitness() {
        let day = DayStrategy::Optimized {
            strategy: Strategy::from_genes(vec![false, true]),
            fitness: 42.0,
        };
        assert_eq!(day.decision(0), Decision::StandDown);
        assert_eq!(day.source(), DecisionSource::Optimized { fitness: 42.0 });
    }
}
