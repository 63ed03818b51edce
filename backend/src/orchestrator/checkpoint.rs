//! Checkpoint - Fleet Snapshots
//!
//! Captures the full state of a fleet as plain serializable data with a
//! content fingerprint. Comparison runs use the fingerprint to prove that
//! the policy and baseline engines started from the same fleet.
//!
//! # Critical Invariants
//!
//! - **Determinism**: Same fleet produces the same fingerprint
//! - **Round Trip**: `restore(capture(fleet)) == fleet`
//! - **Dense Ids**: Snapshot machines are ordered with ids `0..N`

use crate::models::{validate_fleet, FailureCounts, Machine, MachineId};
use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Fleet state at the start of a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    /// Day index the snapshot was taken before
    pub day: usize,

    pub machines: Vec<MachineSnapshot>,

    /// SHA256 of the canonical JSON of `machines`
    pub fingerprint: String,
}

/// Machine state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub id: MachineId,
    pub daily_operating_cost: f64,
    pub daily_operating_profit: f64,
    pub operating_hours: u32,
    pub age: u32,
    pub unavailable_days: u32,
    pub days_since_last_failure: u32,
    pub failure_counts: FailureCounts,
}

impl From<&Machine> for MachineSnapshot {
    fn from(machine: &Machine) -> Self {
        MachineSnapshot {
            id: machine.id(),
            daily_operating_cost: machine.daily_operating_cost(),
            daily_operating_profit: machine.daily_operating_profit(),
            operating_hours: machine.operating_hours(),
            age: machine.age(),
            unavailable_days: machine.unavailable_days(),
            days_since_last_failure: machine.days_since_last_failure(),
            failure_counts: machine.failure_counts(),
        }
    }
}

impl From<MachineSnapshot> for Machine {
    fn from(snapshot: MachineSnapshot) -> Self {
        Machine::from_parts(
            snapshot.id,
            snapshot.daily_operating_cost,
            snapshot.daily_operating_profit,
            snapshot.operating_hours,
            snapshot.age,
            snapshot.unavailable_days,
            snapshot.days_since_last_failure,
            snapshot.failure_counts,
        )
    }
}

impl FleetSnapshot {
    /// Snapshot a fleet and fingerprint it
    pub fn capture(day: usize, machines: &[Machine]) -> Result<Self, SimulationError> {
        let machines: Vec<MachineSnapshot> = machines.iter().map(MachineSnapshot::from).collect();
        let fingerprint = compute_content_hash(&machines)?;
        Ok(Self {
            day,
            machines,
            fingerprint,
        })
    }

    /// Rebuild owned machines from the snapshot
    pub fn restore(&self) -> Vec<Machine> {
        self.machines.iter().cloned().map(Machine::from).collect()
    }

    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }
}

// ============================================================================
// Hashing
// ============================================================================

/// Compute SHA256 hash of any serializable value
///
/// Object keys are sorted recursively before hashing, so the hash depends
/// only on content.
pub fn compute_content_hash<T: Serialize>(value: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(value)
        .map_err(|e| SimulationError::Serialization(format!("snapshot serialization failed: {}", e)))?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| SimulationError::Serialization(format!("snapshot serialization failed: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validate snapshot integrity
///
/// Checks:
/// - Dense, ordered machine ids
/// - Fingerprint matches the machine data
pub fn validate_snapshot(snapshot: &FleetSnapshot) -> Result<(), SimulationError> {
    validate_fleet(&snapshot.restore())?;

    let found = compute_content_hash(&snapshot.machines)?;
    if found != snapshot.fingerprint {
        return Err(SimulationError::SnapshotMismatch {
            expected: snapshot.fingerprint.clone(),
            found,
        });
    }
    Ok(())
}
