//! Fleet generation and validation
//!
//! A fleet is the fixed set of machines governed by one run. Machine ids are
//! dense (`0..N`, in order) so that strategies can index genes by id.

use crate::config::ConfigError;
use crate::models::machine::Machine;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// Parameters for generating a random fleet
///
/// Ranges are inclusive integer bounds `(min, max)`.
///
/// # Example
/// ```
/// use maintenance_simulator_core_rs::{FleetConfig, RngManager};
///
/// let config = FleetConfig { machine_count: 4, ..Default::default() };
/// let fleet = config.generate(&mut RngManager::new(42)).unwrap();
/// assert_eq!(fleet.len(), 4);
/// assert!(fleet.iter().enumerate().all(|(i, m)| m.id() == i));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Number of machines
    pub machine_count: usize,

    /// Daily operating cost bounds
    pub cost_range: (i64, i64),

    /// Daily operating profit bounds
    pub profit_range: (i64, i64),

    /// Nominal duty length bounds in hours
    pub operating_hours_range: (i64, i64),
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            machine_count: 10,
            cost_range: (20, 80),
            profit_range: (150, 500),
            operating_hours_range: (8, 24),
        }
    }
}

impl FleetConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("cost_range", self.cost_range)?;
        check_range("profit_range", self.profit_range)?;
        check_range("operating_hours_range", self.operating_hours_range)?;
        Ok(())
    }

    /// Draw a fleet with dense ids and uniformly sampled economics
    pub fn generate(&self, rng: &mut RngManager) -> Result<Vec<Machine>, ConfigError> {
        self.validate()?;

        let fleet = (0..self.machine_count)
            .map(|id| {
                let hours = rng.range_inclusive(self.operating_hours_range.0, self.operating_hours_range.1);
                let cost = rng.range_inclusive(self.cost_range.0, self.cost_range.1);
                let profit = rng.range_inclusive(self.profit_range.0, self.profit_range.1);
                Machine::new(id, cost as f64, profit as f64).with_operating_hours(hours as u32)
            })
            .collect();

        Ok(fleet)
    }
}

fn check_range(field: &'static str, (min, max): (i64, i64)) -> Result<(), ConfigError> {
    if min < 0 {
        return Err(ConfigError::NegativeValue {
            field,
            value: min as f64,
        });
    }
    if min > max {
        return Err(ConfigError::InvalidRange { field, min, max });
    }
    Ok(())
}

/// Check the invariants every fleet handed to an engine must satisfy
///
/// - ids are exactly `0..N` in order
/// - economics are finite and non-negative
pub fn validate_fleet(machines: &[Machine]) -> Result<(), ConfigError> {
    for (position, machine) in machines.iter().enumerate() {
        if machine.id() != position {
            return Err(ConfigError::NonDenseFleet {
                position,
                found: machine.id(),
            });
        }
        for (field, value) in [
            ("daily_operating_cost", machine.daily_operating_cost()),
            ("daily_operating_profit", machine.daily_operating_profit()),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeValue { field, value });
            }
        }
    }
    Ok(())
}
