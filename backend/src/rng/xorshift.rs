//! xorshift64* random number generator
//!
//! Fast, deterministic PRNG used for every stochastic draw in the simulator:
//! failure triggers, severity classification, fleet generation, and the
//! genetic search (initial genes, parent selection, crossover cuts, mutation).
//!
//! # Determinism
//!
//! Same seed → same sequence of random numbers. A run is reproducible from
//! its seed alone, which is what makes the policy-vs-baseline comparison and
//! the statistical tests meaningful.

use serde::{Deserialize, Serialize};

/// Multiplier applied to the state when deriving child seeds in [`RngManager::fork`].
const FORK_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use maintenance_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let value = rng.next();
/// let range_value = rng.range(0, 100); // [0, 100)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is mapped to 1 (xorshift cannot leave the all-zero state).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random value in range [min, max)
    ///
    /// # Panics
    /// Panics if min >= max
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as i64
    }

    /// Generate random value in range [min, max] (both inclusive)
    ///
    /// # Panics
    /// Panics if min > max
    ///
    /// # Example
    /// ```
    /// use maintenance_simulator_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(7);
    /// let cost = rng.range_inclusive(20, 80);
    /// assert!((20..=80).contains(&cost));
    /// ```
    pub fn range_inclusive(&mut self, min: i64, max: i64) -> i64 {
        assert!(min <= max, "min must not exceed max");
        if min == max {
            return min;
        }
        self.range(min, max + 1)
    }

    /// Uniform index in [0, n)
    ///
    /// # Panics
    /// Panics if n == 0
    pub fn index(&mut self, n: usize) -> usize {
        assert!(n > 0, "cannot draw an index from an empty range");
        (self.next() % n as u64) as usize
    }

    /// Get current RNG state (for checkpointing/replay)
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // Keep the top 53 bits so every value is exactly representable
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Fair coin flip
    pub fn next_bool(&mut self) -> bool {
        self.next() >> 63 == 1
    }

    /// Bernoulli trial: true with probability `p`
    ///
    /// One draw is consumed regardless of `p`, so the stream position does not
    /// depend on the probability value. `p <= 0` never fires, `p >= 1` always does.
    ///
    /// # Example
    /// ```
    /// use maintenance_simulator_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(1);
    /// assert!(rng.chance(1.0));
    /// assert!(!rng.chance(0.0));
    /// ```
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Categorical sampling: returns index `i` with probability `weights[i] / sum(weights)`
    ///
    /// Zero-weight entries are never selected.
    ///
    /// # Panics
    /// Panics if `weights` is empty or sums to a non-positive value.
    pub fn weighted_index(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        assert!(
            !weights.is_empty() && total > 0.0,
            "weights must be non-empty with a positive sum"
        );

        let mut target = self.next_f64() * total;
        let mut last_positive = 0;
        for (i, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            last_positive = i;
            if target < weight {
                return i;
            }
            target -= weight;
        }

        // Floating-point residue past the final bucket lands on the last
        // selectable entry.
        last_positive
    }

    /// Ordered pair of distinct indices drawn uniformly from [0, n)
    ///
    /// When `n == 1` the only index is returned twice; there is no
    /// second element to pair with.
    ///
    /// # Panics
    /// Panics if n == 0
    pub fn two_distinct(&mut self, n: usize) -> (usize, usize) {
        assert!(n > 0, "cannot draw from an empty range");
        if n == 1 {
            return (0, 0);
        }
        let first = self.index(n);
        // Draw from the n-1 remaining slots and skip over `first`
        let mut second = self.index(n - 1);
        if second >= first {
            second += 1;
        }
        (first, second)
    }

    /// Derive an independent child generator, advancing this one by one draw
    ///
    /// Used to hand each fitness evaluation its own stream so evaluations can
    /// run in any order (or in parallel) without changing results.
    pub fn fork(&mut self) -> RngManager {
        let seed = self.next() ^ FORK_MIX;
        RngManager::new(seed.wrapping_mul(FORK_MIX) | 1)
    }
}
