//! Day strategy genome
//!
//! A [`Strategy`] is one full day of decisions for the fleet: a fixed-length
//! boolean vector indexed by machine id (`true` = operate, `false` = stand
//! down) plus a cached fitness. The cache is cleared whenever a gene changes,
//! so a stale score can never survive a mutation.

use crate::models::machine::{Decision, MachineId};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// Operate/stand-down decision vector with cached fitness
///
/// # Example
/// ```
/// use maintenance_simulator_core_rs::{Decision, Strategy};
///
/// let strategy = Strategy::from_genes(vec![true, false, true]);
/// assert_eq!(strategy.decision(1), Decision::StandDown);
/// assert_eq!(strategy.fitness(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    genes: Vec<bool>,
    fitness: Option<f64>,
}

impl Strategy {
    /// Wrap an explicit gene vector (fitness unevaluated)
    pub fn from_genes(genes: Vec<bool>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    /// Operate every machine
    pub fn operate_all(machine_count: usize) -> Self {
        Self::from_genes(vec![true; machine_count])
    }

    /// Stand every machine down
    pub fn stand_down_all(machine_count: usize) -> Self {
        Self::from_genes(vec![false; machine_count])
    }

    /// Independently random genes (fair coin per machine)
    pub fn random(machine_count: usize, rng: &mut RngManager) -> Self {
        Self::from_genes((0..machine_count).map(|_| rng.next_bool()).collect())
    }

    pub fn genes(&self) -> &[bool] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Decision for one machine
    ///
    /// # Panics
    /// Panics if `machine_id` is outside the gene vector.
    pub fn decision(&self, machine_id: MachineId) -> Decision {
        Decision::from_gene(self.genes[machine_id])
    }

    /// Number of machines this strategy operates
    pub fn operating_count(&self) -> usize {
        self.genes.iter().filter(|&&g| g).count()
    }

    /// Cached fitness, `None` until evaluated or after a gene change
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Overwrite one gene, clearing the cached fitness if it changed
    pub fn set_gene(&mut self, machine_id: MachineId, operate: bool) {
        if self.genes[machine_id] != operate {
            self.genes[machine_id] = operate;
            self.fitness = None;
        }
    }

    /// Single-point crossover at an explicit cut
    ///
    /// Child gene `i` comes from `parent1` when `i < cut`, from `parent2`
    /// otherwise. A cut past the end copies `parent1` entirely.
    ///
    /// # Panics
    /// Panics if the parents have different lengths.
    ///
    /// # Example
    /// ```
    /// use maintenance_simulator_core_rs::Strategy;
    ///
    /// let a = Strategy::from_genes(vec![true, true, true, true]);
    /// let b = Strategy::from_genes(vec![false, false, false, false]);
    /// let child = Strategy::crossover_at(&a, &b, 1);
    /// assert_eq!(child.genes(), &[true, false, false, false]);
    /// ```
    pub fn crossover_at(parent1: &Strategy, parent2: &Strategy, cut: usize) -> Strategy {
        assert_eq!(
            parent1.len(),
            parent2.len(),
            "crossover parents must have the same gene count"
        );
        let cut = cut.min(parent1.len());
        let genes = parent1.genes[..cut]
            .iter()
            .chain(&parent2.genes[cut..])
            .copied()
            .collect();
        Strategy::from_genes(genes)
    }

    /// Single-point crossover with a cut drawn uniformly from `[1, N-1]`
    ///
    /// With fewer than two genes there is no interior cut point; the child is
    /// a copy of `parent1` and no random draw is consumed.
    pub fn crossover(parent1: &Strategy, parent2: &Strategy, rng: &mut RngManager) -> Strategy {
        let n = parent1.len();
        let cut = if n < 2 {
            n
        } else {
            rng.range_inclusive(1, n as i64 - 1) as usize
        };
        Self::crossover_at(parent1, parent2, cut)
    }

    /// Flip each gene independently with probability `rate`
    ///
    /// Exactly one draw is consumed per gene. Returns the number of flips.
    pub fn mutate(&mut self, rate: f64, rng: &mut RngManager) -> usize {
        let mut flips = 0;
        for gene in self.genes.iter_mut() {
            if rng.chance(rate) {
                *gene = !*gene;
                flips += 1;
            }
        }
        if flips > 0 {
            self.fitness = None;
        }
        flips
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_gene_invalidates_fitness() {
        let mut strategy = Strategy::operate_all(3);
        strategy.set_fitness(10.0);

        strategy.set_gene(0, true);
        assert_eq!(strategy.fitness(), Some(10.0), "unchanged gene keeps cache");

        strategy.set_gene(0, false);
        assert_eq!(strategy.fitness(), None);
    }

    #[test]
    fn test_crossover_single_gene_copies_parent1() {
        let a = Strategy::from_genes(vec![true]);
        let b = Strategy::from_genes(vec![false]);
        let mut rng = RngManager::new(3);
        let state_before = rng.get_state();

        let child = Strategy::crossover(&a, &b, &mut rng);
        assert_eq!(child.genes(), &[true]);
        assert_eq!(rng.get_state(), state_before, "no draw for degenerate cut");
    }

    #[test]
    fn test_crossover_empty() {
        let a = Strategy::from_genes(vec![]);
        let mut rng = RngManager::new(3);
        assert!(Strategy::crossover(&a, &a, &mut rng).is_empty());
    }

    #[test]
    #[should_panic(expected = "same gene count")]
    fn test_crossover_length_mismatch_panics() {
        let a = Strategy::operate_all(2);
        let b = Strategy::operate_all(3);
        Strategy::crossover_at(&a, &b, 1);
    }

    #[test]
    fn test_mutate_rate_extremes() {
        let mut rng = RngManager::new(11);
        let mut strategy = Strategy::operate_all(8);
        strategy.set_fitness(1.0);

        assert_eq!(strategy.mutate(0.0, &mut rng), 0);
        assert_eq!(strategy.fitness(), Some(1.0));

        assert_eq!(strategy.mutate(1.0, &mut rng), 8);
        assert_eq!(strategy.operating_count(), 0);
        assert_eq!(strategy.fitness(), None);
    }
}
