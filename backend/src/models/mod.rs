//! Domain models for the maintenance simulator

pub mod event;
pub mod fleet;
pub mod machine;
pub mod strategy;

// Re-exports
pub use event::{DayLog, DayRecord, DecisionSource, EventKind, MachineEvent};
pub use fleet::{validate_fleet, FleetConfig};
pub use machine::{Decision, FailureCounts, Machine, MachineCondition, MachineId};
pub use strategy::Strategy;
