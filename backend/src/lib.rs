//! Fleet Maintenance Simulator Core - Rust Engine
//!
//! Day-by-day simulation of a machine fleet under stochastic failures, with
//! a genetic search choosing which machines to stand down preventively.
//!
//! # Architecture
//!
//! - **core**: Time management and phases
//! - **models**: Domain types (Machine, Strategy, DayRecord)
//! - **failure**: Per-machine stochastic day transition
//! - **predictor**: Risk predictor contract and features
//! - **optimizer**: Genetic search over day strategies
//! - **policy**: Which strategy a day runs
//! - **orchestrator**: Main simulation loop and comparison runs
//! - **summary**: Aggregation over day records
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (seeded RNG)
//! 2. Machine ids are dense `0..N` and index every per-machine array
//! 3. Day records are append-only and never mutated

// Module declarations
pub mod config;
pub mod core;
pub mod failure;
pub mod models;
pub mod optimizer;
pub mod orchestrator;
pub mod policy;
pub mod predictor;
pub mod rng;
pub mod summary;

// Re-exports for convenience
pub use config::{ConfigError, ScenarioConfig};
pub use core::time::{SimulationPhase, TimeManager};
pub use failure::{FailureModel, FailureModelConfig, Severity};
pub use models::{
    DayLog, DayRecord, Decision, DecisionSource, EventKind, FailureCounts, FleetConfig, Machine, MachineEvent,
    MachineId, Strategy,
};
pub use optimizer::{GeneticOptimizer, OptimizerConfig, OptimizerError};
pub use orchestrator::{
    run_comparison, ComparisonOutcome, FleetSnapshot, RunOutcome, SimulationConfig, SimulationEngine,
    SimulationError,
};
pub use policy::{DayStrategy, PolicyMode};
pub use predictor::{HazardRiskPredictor, MachineFeatures, RiskPredictor};
pub use rng::RngManager;
