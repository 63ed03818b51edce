//! Risk Predictor Module
//!
//! The optimizer shapes fitness with a per-machine risk signal: "stand this
//! machine down preventively". Where that signal comes from is pluggable via
//! the [`RiskPredictor`] trait; the engine receives a predictor as an explicit
//! dependency at construction.
//!
//! # Contract
//!
//! - `predict` is a pure function of the [`MachineFeatures`] snapshot.
//! - It is called at most once per machine per day; [`RiskSignals::collect`]
//!   caches the day's answers for the whole genetic search.
//! - `None` means the predictor has no answer for that machine. That is a
//!   contract violation surfaced as [`OptimizerError::MissingRiskSignal`],
//!   never defaulted.
//!
//! [`HazardRiskPredictor`] is a concrete implementation based on the failure
//! model's own hazard curve. Learned predictors (trained on the warm-up
//! [`TrainingSample`] corpus) live outside this crate and plug in through the
//! same trait.

use crate::config::ConfigError;
use crate::failure::{FailureModel, FailureModelConfig};
use crate::models::{FailureCounts, Machine, MachineId};
use crate::optimizer::OptimizerError;
use serde::{Deserialize, Serialize};

/// Snapshot of one machine as seen by a predictor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineFeatures {
    pub machine_id: MachineId,
    pub age: u32,
    pub days_since_last_failure: u32,
    pub daily_operating_profit: f64,
    pub daily_operating_cost: f64,
    pub failure_counts: FailureCounts,
    pub unavailable_days: u32,
}

impl MachineFeatures {
    /// Numeric feature row: age, days since failure, profit, cost, minor
    /// failures, and major plus total-replacement failures
    pub fn as_row(&self) -> [f64; 6] {
        [
            self.age as f64,
            self.days_since_last_failure as f64,
            self.daily_operating_profit,
            self.daily_operating_cost,
            self.failure_counts.minor as f64,
            (self.failure_counts.major + self.failure_counts.total_replacement) as f64,
        ]
    }
}

impl From<&Machine> for MachineFeatures {
    fn from(machine: &Machine) -> Self {
        MachineFeatures {
            machine_id: machine.id(),
            age: machine.age(),
            days_since_last_failure: machine.days_since_last_failure(),
            daily_operating_profit: machine.daily_operating_profit(),
            daily_operating_cost: machine.daily_operating_cost(),
            failure_counts: machine.failure_counts(),
            unavailable_days: machine.unavailable_days(),
        }
    }
}

/// One labelled observation for training an external predictor
///
/// Features are captured before the day's transition; `failed` records
/// whether the machine failed that day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub day: usize,
    pub features: MachineFeatures,
    pub failed: bool,
}

/// Source of preventive stand-down recommendations
///
/// # Example
///
/// ```rust
/// use maintenance_simulator_core_rs::predictor::{MachineFeatures, RiskPredictor};
///
/// /// Flags anything older than a fixed number of days
/// struct AgeLimit(u32);
///
/// impl RiskPredictor for AgeLimit {
///     fn predict(&self, features: &MachineFeatures) -> Option<bool> {
///         Some(features.age > self.0)
///     }
/// }
/// ```
pub trait RiskPredictor: Send + Sync {
    /// `Some(true)` recommends standing the machine down today
    fn predict(&self, features: &MachineFeatures) -> Option<bool>;

    /// Name used in diagnostics
    fn name(&self) -> &str {
        "risk-predictor"
    }
}

/// One day's cached risk signals, indexed by machine id
#[derive(Debug, Clone, PartialEq)]
pub struct RiskSignals {
    signals: Vec<bool>,
}

impl RiskSignals {
    /// Query the predictor once per machine
    pub fn collect(predictor: &dyn RiskPredictor, machines: &[Machine]) -> Result<Self, OptimizerError> {
        let signals = machines
            .iter()
            .map(|machine| {
                predictor
                    .predict(&MachineFeatures::from(machine))
                    .ok_or(OptimizerError::MissingRiskSignal {
                        machine_id: machine.id(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { signals })
    }

    /// Wrap precomputed signals
    pub fn from_signals(signals: Vec<bool>) -> Self {
        Self { signals }
    }

    /// No machine flagged
    pub fn quiet(machine_count: usize) -> Self {
        Self::from_signals(vec![false; machine_count])
    }

    pub fn recommends_stand_down(&self, machine_id: MachineId) -> bool {
        self.signals[machine_id]
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn flagged_count(&self) -> usize {
        self.signals.iter().filter(|&&s| s).count()
    }
}

/// Predictor tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Recommend stand-down when expected failure cost exceeds
    /// `daily_operating_cost × threshold_factor`
    pub threshold_factor: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            threshold_factor: 1.0,
        }
    }
}

impl PredictorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold_factor.is_finite() || self.threshold_factor < 0.0 {
            return Err(ConfigError::NegativeValue {
                field: "threshold_factor",
                value: self.threshold_factor,
            });
        }
        Ok(())
    }
}

/// Expected-cost rule over the failure model's hazard curve
///
/// ```text
/// expected_failure_cost = p(age) × Σ weight_s × repair_cost_s
/// recommend stand-down  ⇔ expected_failure_cost > daily_cost × threshold_factor
/// ```
///
/// The expected cost never drops below its value at age 0, and a stand-down
/// only resets age. A machine whose daily cost is below
/// `base_fail_rate × expected_repair_cost / threshold_factor` is therefore
/// flagged on every day, whatever its history. With the default failure
/// model and a threshold of 1.0 that floor is 0.01 × 6100 = 61, which lies
/// inside the default fleet cost range, so a default comparison spends most
/// policy days standing the cheaper machines down. Raise `threshold_factor`
/// (see [`HazardRiskPredictor::always_flagged_below`]) to flag on wear only.
#[derive(Debug, Clone)]
pub struct HazardRiskPredictor {
    model: FailureModel,
    threshold_factor: f64,
}

impl HazardRiskPredictor {
    pub fn new(failure: FailureModelConfig, config: PredictorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            model: FailureModel::new(failure)?,
            threshold_factor: config.threshold_factor,
        })
    }

    /// Daily cost under which a machine is flagged even when brand new
    pub fn always_flagged_below(&self) -> f64 {
        self.model.failure_probability(0) * self.model.config().severities.expected_repair_cost()
            / self.threshold_factor
    }

    /// Probability-weighted cost of a failure today
    pub fn expected_failure_cost(&self, features: &MachineFeatures) -> f64 {
        self.model.failure_probability(features.age)
            * self.model.config().severities.expected_repair_cost()
    }
}

impl RiskPredictor for HazardRiskPredictor {
    fn predict(&self, features: &MachineFeatures) -> Option<bool> {
        Some(self.expected_failure_cost(features) > features.daily_operating_cost * self.threshold_factor)
    }

    fn name(&self) -> &str {
        "hazard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl RiskPredictor for Silent {
        fn predict(&self, _features: &MachineFeatures) -> Option<bool> {
            None
        }
    }

    #[test]
    fn test_missing_signal_is_error() {
        let fleet = vec![Machine::new(0, 10.0, 20.0)];
        let err = RiskSignals::collect(&Silent, &fleet).unwrap_err();
        assert_eq!(err, OptimizerError::MissingRiskSignal { machine_id: 0 });
    }

    #[test]
    fn test_hazard_threshold() {
        let predictor =
            HazardRiskPredictor::new(FailureModelConfig::default(), PredictorConfig::default()).unwrap();

        // Fresh machine: 0.01 × 6100 = 61
        let cheap = MachineFeatures::from(&Machine::new(0, 50.0, 200.0));
        let pricey = MachineFeatures::from(&Machine::new(1, 80.0, 200.0));
        assert_eq!(predictor.predict(&cheap), Some(true));
        assert_eq!(predictor.predict(&pricey), Some(false));
    }

    #[test]
    fn test_cost_floor_flags_fresh_machines() {
        let default =
            HazardRiskPredictor::new(FailureModelConfig::default(), PredictorConfig::default()).unwrap();
        assert!((default.always_flagged_below() - 61.0).abs() < 1e-9);

        // Standing down only resets age, so the flag never clears below the floor
        let stood_down = Machine::from_parts(0, 60.0, 400.0, 24, 0, 0, 500, FailureCounts::default());
        assert_eq!(default.predict(&MachineFeatures::from(&stood_down)), Some(true));
        let at_floor = Machine::new(1, 61.0, 400.0);
        assert_eq!(default.predict(&MachineFeatures::from(&at_floor)), Some(false));

        let relaxed = HazardRiskPredictor::new(
            FailureModelConfig::default(),
            PredictorConfig { threshold_factor: 4.0 },
        )
        .unwrap();
        assert!(relaxed.always_flagged_below() < 20.0, "below the cheapest default machine");
        let worn = Machine::from_parts(2, 40.0, 400.0, 24, 80, 0, 80, FailureCounts::default());
        // 0.05 × 6100 = 305 > 40 × 4
        assert_eq!(relaxed.predict(&MachineFeatures::from(&worn)), Some(true));
        assert_eq!(relaxed.predict(&MachineFeatures::from(&Machine::new(3, 40.0, 400.0))), Some(false));
    }

    #[test]
    fn test_feature_row_merges_severe_counts() {
        let machine = Machine::from_parts(
            0,
            30.0,
            300.0,
            12,
            5,
            0,
            9,
            FailureCounts {
                minor: 2,
                major: 1,
                total_replacement: 1,
            },
        );
        let row = MachineFeatures::from(&machine).as_row();
        assert_eq!(row, [5.0, 9.0, 300.0, 30.0, 2.0, 2.0]);
    }
}
