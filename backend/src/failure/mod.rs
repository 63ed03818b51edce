//! Failure Model
//!
//! Stochastic day transition for a single machine. Given the machine's state
//! and the day's decision, the model yields the profit delta and the event
//! kind, and (through [`FailureModel::apply`]) commits the state transition.
//!
//! # Transition rules
//!
//! ```text
//! unavailable_days > 0  → recovering: delta 0, countdown -1, decision ignored
//! stand down            → delta -cost, age reset to 0
//! operate               → p = min(base + age × factor, max)
//!     failure (p)       → severity ~ {minor, major, total} weights,
//!                         delta -repair_cost, recovery starts, age reset,
//!                         days-since-failure reset, counter +1
//!     no failure        → delta profit - cost, age +1
//! ```
//!
//! Days-since-last-failure advances by one at the end of every non-recovering
//! day, including the failure day itself (reset, then advanced).
//!
//! [`FailureModel::sample`] evaluates the same rules without touching the
//! machine, which is what optimizer rollouts use.

use crate::config::ConfigError;
use crate::models::{Decision, EventKind, Machine, MachineCondition};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Tolerance for the severity weights summing to one
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Failure severity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    Major,
    TotalReplacement,
}

impl Severity {
    /// All tiers in ascending severity; the order of categorical sampling
    pub const ALL: [Severity; 3] = [Severity::Minor, Severity::Major, Severity::TotalReplacement];
}

/// Cost, downtime, and likelihood of one severity tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityParams {
    /// Probability of this tier given that a failure happened
    pub weight: f64,
    /// Repair cost charged on the failure day
    pub repair_cost: f64,
    /// Mandatory recovery days after the failure day
    pub recovery_days: u32,
}

/// Parameters for every tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityTable {
    pub minor: SeverityParams,
    pub major: SeverityParams,
    pub total_replacement: SeverityParams,
}

impl Default for SeverityTable {
    fn default() -> Self {
        Self {
            minor: SeverityParams {
                weight: 0.6,
                repair_cost: 2_000.0,
                recovery_days: 2,
            },
            major: SeverityParams {
                weight: 0.3,
                repair_cost: 8_000.0,
                recovery_days: 7,
            },
            total_replacement: SeverityParams {
                weight: 0.1,
                repair_cost: 25_000.0,
                recovery_days: 30,
            },
        }
    }
}

impl SeverityTable {
    pub fn get(&self, severity: Severity) -> &SeverityParams {
        match severity {
            Severity::Minor => &self.minor,
            Severity::Major => &self.major,
            Severity::TotalReplacement => &self.total_replacement,
        }
    }

    /// Weights in [`Severity::ALL`] order
    pub fn weights(&self) -> [f64; 3] {
        Severity::ALL.map(|s| self.get(s).weight)
    }

    /// Repair cost averaged over the severity distribution
    pub fn expected_repair_cost(&self) -> f64 {
        Severity::ALL
            .iter()
            .map(|&s| {
                let params = self.get(s);
                params.weight * params.repair_cost
            })
            .sum()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut sum = 0.0;
        for severity in Severity::ALL {
            let params = self.get(severity);
            if !params.weight.is_finite() || params.weight < 0.0 {
                return Err(ConfigError::NegativeValue {
                    field: "severity weight",
                    value: params.weight,
                });
            }
            if !params.repair_cost.is_finite() || params.repair_cost < 0.0 {
                return Err(ConfigError::NegativeValue {
                    field: "repair_cost",
                    value: params.repair_cost,
                });
            }
            sum += params.weight;
        }

        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::SeverityWeights { sum });
        }
        Ok(())
    }
}

/// Failure-rate constants and severity tiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureModelConfig {
    /// Daily failure probability of a freshly reset machine
    pub base_fail_rate: f64,
    /// Added probability per day of age
    pub age_fail_factor: f64,
    /// Ceiling on the daily failure probability
    pub max_fail_rate: f64,
    pub severities: SeverityTable,
}

impl Default for FailureModelConfig {
    fn default() -> Self {
        Self {
            base_fail_rate: 0.01,
            age_fail_factor: 0.0005,
            max_fail_rate: 0.05,
            severities: SeverityTable::default(),
        }
    }
}

impl FailureModelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("base_fail_rate", self.base_fail_rate),
            ("max_fail_rate", self.max_fail_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { field, value });
            }
        }
        if !self.age_fail_factor.is_finite() || self.age_fail_factor < 0.0 {
            return Err(ConfigError::NegativeValue {
                field: "age_fail_factor",
                value: self.age_fail_factor,
            });
        }
        self.severities.validate()
    }
}

/// Result of one machine-day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayOutcome {
    pub kind: EventKind,
    pub profit_delta: f64,
}

impl DayOutcome {
    pub fn failed(&self) -> bool {
        self.kind.is_failure()
    }
}

/// Stochastic per-machine day transition
#[derive(Debug, Clone)]
pub struct FailureModel {
    config: FailureModelConfig,
}

impl FailureModel {
    pub fn new(config: FailureModelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FailureModelConfig {
        &self.config
    }

    /// Daily failure probability for a machine of the given age
    ///
    /// # Example
    /// ```
    /// use maintenance_simulator_core_rs::failure::{FailureModel, FailureModelConfig};
    ///
    /// let model = FailureModel::new(FailureModelConfig::default()).unwrap();
    /// assert!((model.failure_probability(0) - 0.01).abs() < 1e-12);
    /// assert!((model.failure_probability(1_000) - 0.05).abs() < 1e-12);
    /// ```
    pub fn failure_probability(&self, age: u32) -> f64 {
        let raw = self.config.base_fail_rate + age as f64 * self.config.age_fail_factor;
        raw.min(self.config.max_fail_rate)
    }

    /// Evaluate the day without changing the machine
    ///
    /// RNG draws happen only when the machine operates: one for the failure
    /// trigger and, on failure, one for the severity.
    pub fn sample(&self, machine: &Machine, decision: Decision, rng: &mut RngManager) -> DayOutcome {
        match machine.condition(decision) {
            MachineCondition::Recovering => DayOutcome {
                kind: EventKind::Recovering,
                profit_delta: 0.0,
            },
            MachineCondition::StoodDown => DayOutcome {
                kind: EventKind::PreventiveStandDown,
                profit_delta: -machine.daily_operating_cost(),
            },
            MachineCondition::Operating => {
                if rng.chance(self.failure_probability(machine.age())) {
                    let severity = self.draw_severity(rng);
                    DayOutcome {
                        kind: EventKind::failure(severity),
                        profit_delta: -self.config.severities.get(severity).repair_cost,
                    }
                } else {
                    DayOutcome {
                        kind: EventKind::Operating,
                        profit_delta: machine.operating_margin(),
                    }
                }
            }
        }
    }

    /// Evaluate the day and commit the resulting state transition
    pub fn apply(&self, machine: &mut Machine, decision: Decision, rng: &mut RngManager) -> DayOutcome {
        let outcome = self.sample(machine, decision, rng);
        self.commit(machine, &outcome);
        outcome
    }

    fn commit(&self, machine: &mut Machine, outcome: &DayOutcome) {
        match outcome.kind {
            EventKind::Recovering => machine.advance_recovery(),
            EventKind::PreventiveStandDown => machine.stand_down(),
            EventKind::Operating => machine.complete_operating_day(),
            failure => {
                // Only failure kinds remain
                if let Some(severity) = failure.severity() {
                    let recovery_days = self.config.severities.get(severity).recovery_days;
                    trace!(
                        machine_id = machine.id(),
                        ?severity,
                        recovery_days,
                        "machine failed"
                    );
                    machine.register_failure(severity, recovery_days);
                }
            }
        }
    }

    fn draw_severity(&self, rng: &mut RngManager) -> Severity {
        Severity::ALL[rng.weighted_index(&self.config.severities.weights())]
    }
}
