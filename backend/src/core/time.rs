//! Time management for the simulation
//!
//! The simulation advances in whole days. The first `warmup_days` days form
//! the warm-up phase; after that, days are policy-driven (or baseline when the
//! optimizer is disabled) until `total_days` have elapsed.

use serde::{Deserialize, Serialize};

/// Phase the simulation is in for the current day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationPhase {
    /// Operate-everything days that build the predictor's training corpus
    WarmUp,
    /// The optimizer chooses each day's strategy
    PolicyDriven,
    /// Post-warm-up day in a run without the optimizer
    Baseline,
    /// Day budget exhausted; no further days can be simulated
    Terminal,
}

/// Manages simulated days and the warm-up threshold
///
/// # Example
/// ```
/// use maintenance_simulator_core_rs::TimeManager;
///
/// let mut time = TimeManager::new(10, 3);
/// assert_eq!(time.current_day(), 0);
/// assert!(time.in_warmup());
///
/// time.advance_day();
/// assert_eq!(time.current_day(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeManager {
    /// Days elapsed since simulation start (index of the next day to run)
    current_day: usize,
    /// Total days the run will simulate
    total_days: usize,
    /// Days before the optimizer may take over
    warmup_days: usize,
}

impl TimeManager {
    /// Create a new TimeManager
    ///
    /// # Panics
    /// Panics if `total_days` is zero.
    pub fn new(total_days: usize, warmup_days: usize) -> Self {
        assert!(total_days > 0, "total_days must be positive");
        Self {
            current_day: 0,
            total_days,
            warmup_days,
        }
    }

    /// Advance time by one day
    ///
    /// Saturates at `total_days`; the terminal day is never passed.
    pub fn advance_day(&mut self) {
        if self.current_day < self.total_days {
            self.current_day += 1;
        }
    }

    /// Index of the day about to be simulated (0-indexed)
    pub fn current_day(&self) -> usize {
        self.current_day
    }

    /// Total day budget
    pub fn total_days(&self) -> usize {
        self.total_days
    }

    /// Warm-up threshold
    pub fn warmup_days(&self) -> usize {
        self.warmup_days
    }

    /// Days left before terminal
    pub fn remaining_days(&self) -> usize {
        self.total_days - self.current_day
    }

    /// True while the current day is inside the warm-up window
    pub fn in_warmup(&self) -> bool {
        self.current_day < self.warmup_days
    }

    /// True once every day of the budget has been simulated
    pub fn is_finished(&self) -> bool {
        self.current_day >= self.total_days
    }

    /// Phase for the current day given whether the optimizer is enabled
    ///
    /// # Example
    /// ```
    /// use maintenance_simulator_core_rs::{SimulationPhase, TimeManager};
    ///
    /// let mut time = TimeManager::new(3, 1);
    /// assert_eq!(time.phase(true), SimulationPhase::WarmUp);
    /// time.advance_day();
    /// assert_eq!(time.phase(true), SimulationPhase::PolicyDriven);
    /// assert_eq!(time.phase(false), SimulationPhase::Baseline);
    /// time.advance_day();
    /// time.advance_day();
    /// assert_eq!(time.phase(true), SimulationPhase::Terminal);
    /// ```
    pub fn phase(&self, policy_enabled: bool) -> SimulationPhase {
        if self.is_finished() {
            SimulationPhase::Terminal
        } else if self.in_warmup() {
            SimulationPhase::WarmUp
        } else if policy_enabled {
            SimulationPhase::PolicyDriven
        } else {
            SimulationPhase::Baseline
        }
    }
}
