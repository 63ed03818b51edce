//! Orchestrator - main simulation loop
//!
//! Implements the day loop integrating all simulation components.
//!
//! See `engine.rs` for the loop itself and `comparison.rs` for paired
//! policy/baseline runs.

pub mod checkpoint;
pub mod comparison;
pub mod engine;


pub use engine::{DayResult, RunOutcome, SimulationConfig, SimulationEngine, SimulationError};

pub use checkpoint::{compute_content_hash, validate_snapshot, FleetSnapshot, MachineSnapshot};
pub use comparison::{compare_fleets, run_comparison, ComparisonOutcome};
