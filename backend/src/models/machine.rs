//! Machine model
//!
//! One production machine in the fleet. Each machine has:
//! - Fixed economics set at creation (daily operating cost and profit)
//! - Wear state (age since last reset, recovery countdown)
//! - Durable failure history (three independent severity counters)
//!
//! # State per day
//!
//! On any given day a machine is in exactly one [`MachineCondition`]:
//! recovering (`unavailable_days > 0`), operating, or stood down. The
//! mutators here are the only way wear state changes, and they are driven by
//! [`crate::failure::FailureModel`].

use crate::failure::Severity;
use serde::{Deserialize, Serialize};

/// Dense machine identifier, `0..fleet_size`, stable for the machine's lifetime
pub type MachineId = usize;

/// The day's operate/stand-down decision for one machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Operate,
    StandDown,
}

impl Decision {
    /// Gene encoding: `true` = operate
    pub fn from_gene(gene: bool) -> Self {
        if gene {
            Decision::Operate
        } else {
            Decision::StandDown
        }
    }

    pub fn is_operate(self) -> bool {
        matches!(self, Decision::Operate)
    }
}

/// Which of the three mutually exclusive daily states a machine is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineCondition {
    /// Mandatory recovery; the day's decision is ignored
    Recovering,
    /// Running this day (may fail)
    Operating,
    /// Preventively stood down this day
    StoodDown,
}

/// Durable failure history, one bucket per severity
///
/// Counters only ever increase. Total-replacement failures have their own
/// bucket; nothing here is a derived sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureCounts {
    pub minor: u32,
    pub major: u32,
    pub total_replacement: u32,
}

impl FailureCounts {
    /// Increment the bucket matching `severity`
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Minor => self.minor += 1,
            Severity::Major => self.major += 1,
            Severity::TotalReplacement => self.total_replacement += 1,
        }
    }

    /// Count for one severity
    pub fn get(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Minor => self.minor,
            Severity::Major => self.major,
            Severity::TotalReplacement => self.total_replacement,
        }
    }

    /// Failures of any severity
    pub fn all(&self) -> u32 {
        self.minor + self.major + self.total_replacement
    }
}

/// A production machine
///
/// # Example
/// ```
/// use maintenance_simulator_core_rs::Machine;
///
/// let machine = Machine::new(0, 50.0, 200.0);
/// assert_eq!(machine.age(), 0);
/// assert!(!machine.is_recovering());
/// assert_eq!(machine.operating_margin(), 150.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    /// Dense fleet index
    id: MachineId,

    /// Cost paid every day the machine is operated or stood down
    daily_operating_cost: f64,

    /// Revenue earned on a day of operation without failure
    daily_operating_profit: f64,

    /// Nominal duty length in hours; informational, does not enter the economics
    operating_hours: u32,

    /// Days since last reset (failure, preventive stand-down)
    age: u32,

    /// Remaining mandatory recovery days
    unavailable_days: u32,

    /// Days since the last failure of any severity
    days_since_last_failure: u32,

    /// Durable failure history
    failure_counts: FailureCounts,
}

impl Machine {
    /// Create a fresh machine with no wear and no history
    pub fn new(id: MachineId, daily_operating_cost: f64, daily_operating_profit: f64) -> Self {
        Self {
            id,
            daily_operating_cost,
            daily_operating_profit,
            operating_hours: 24,
            age: 0,
            unavailable_days: 0,
            days_since_last_failure: 0,
            failure_counts: FailureCounts::default(),
        }
    }

    /// Set the nominal duty length
    pub fn with_operating_hours(mut self, hours: u32) -> Self {
        self.operating_hours = hours;
        self
    }

    /// Restore a machine from previously captured state
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: MachineId,
        daily_operating_cost: f64,
        daily_operating_profit: f64,
        operating_hours: u32,
        age: u32,
        unavailable_days: u32,
        days_since_last_failure: u32,
        failure_counts: FailureCounts,
    ) -> Self {
        Self {
            id,
            daily_operating_cost,
            daily_operating_profit,
            operating_hours,
            age,
            unavailable_days,
            days_since_last_failure,
            failure_counts,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> MachineId {
        self.id
    }

    pub fn daily_operating_cost(&self) -> f64 {
        self.daily_operating_cost
    }

    pub fn daily_operating_profit(&self) -> f64 {
        self.daily_operating_profit
    }

    pub fn operating_hours(&self) -> u32 {
        self.operating_hours
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn unavailable_days(&self) -> u32 {
        self.unavailable_days
    }

    pub fn days_since_last_failure(&self) -> u32 {
        self.days_since_last_failure
    }

    pub fn failure_counts(&self) -> FailureCounts {
        self.failure_counts
    }

    /// Net result of one uneventful operating day
    pub fn operating_margin(&self) -> f64 {
        self.daily_operating_profit - self.daily_operating_cost
    }

    /// True while in mandatory recovery
    pub fn is_recovering(&self) -> bool {
        self.unavailable_days > 0
    }

    /// Resolve the day's state from the recovery countdown and the decision
    pub fn condition(&self, decision: Decision) -> MachineCondition {
        if self.is_recovering() {
            MachineCondition::Recovering
        } else if decision.is_operate() {
            MachineCondition::Operating
        } else {
            MachineCondition::StoodDown
        }
    }

    // ========================================================================
    // Transitions (driven by the failure model)
    // ========================================================================

    /// One recovery day elapses. Nothing else changes.
    pub(crate) fn advance_recovery(&mut self) {
        debug_assert!(self.unavailable_days > 0, "machine is not recovering");
        self.unavailable_days -= 1;
    }

    /// Preventive stand-down: rejuvenates the machine
    pub(crate) fn stand_down(&mut self) {
        self.age = 0;
        self.end_of_day();
    }

    /// Operated the full day without failing
    pub(crate) fn complete_operating_day(&mut self) {
        self.age += 1;
        self.end_of_day();
    }

    /// Failed while operating: enter recovery and reset wear
    pub(crate) fn register_failure(&mut self, severity: Severity, recovery_days: u32) {
        self.age = 0;
        self.days_since_last_failure = 0;
        self.unavailable_days = recovery_days;
        self.failure_counts.record(severity);
        self.end_of_day();
    }

    fn end_of_day(&mut self) {
        self.days_since_last_failure += 1;
    }
}
