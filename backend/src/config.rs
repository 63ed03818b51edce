//! Scenario configuration
//!
//! A [`ScenarioConfig`] bundles everything a run needs: fleet generation
//! parameters, the simulation settings (day budget, warm-up, seed, failure
//! model, optimizer), and predictor tuning. Every field has a default, so a
//! JSON document only needs to mention what it overrides:
//!
//! ```json
//! {
//!   "fleet": { "machine_count": 4 },
//!   "simulation": { "total_days": 400, "optimizer": { "population_size": 20 } }
//! }
//! ```
//!
//! Validation runs once, before any engine is built; every rule violation is
//! a [`ConfigError`].

use crate::models::FleetConfig;
use crate::orchestrator::SimulationConfig;
use crate::predictor::PredictorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Construction-time validation failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("population_size must be at least 2, got {0}")]
    PopulationTooSmall(usize),

    #[error("rollouts must be at least 1")]
    NoRollouts,

    #[error("workers must be at least 1")]
    NoWorkers,

    #[error("total_days must be greater than 0")]
    ZeroDays,

    #[error("{field} must be a probability in [0, 1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },

    #[error("severity weights must sum to 1, got {sum}")]
    SeverityWeights { sum: f64 },

    #[error("{field} must be finite and non-negative, got {value}")]
    NegativeValue { field: &'static str, value: f64 },

    #[error("{field} is empty: min {min} exceeds max {max}")]
    InvalidRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    #[error("fleet ids must be dense and ordered: position {position} holds machine {found}")]
    NonDenseFleet { position: usize, found: usize },

    #[error("optimized policy mode requires a risk predictor")]
    MissingPredictor,

    #[error("failed to read scenario: {0}")]
    Io(String),

    #[error("failed to parse scenario: {0}")]
    Parse(String),
}

/// Complete input for a comparison run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub fleet: FleetConfig,
    pub simulation: SimulationConfig,
    pub predictor: PredictorConfig,
}

impl ScenarioConfig {
    /// Parse and validate a JSON scenario
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ScenarioConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON scenario file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fleet.validate()?;
        self.simulation.validate()?;
        self.predictor.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ScenarioConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ScenarioConfig::default());
    }

    #[test]
    fn test_parse_error_reported() {
        let err = ScenarioConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
