//! Day records for reporting and auditing.
//!
//! Every simulated day produces exactly one immutable [`DayRecord`]: the day
//! index, the fleet's aggregate net profit, which decision source chose the
//! day's strategy, and one [`MachineEvent`] per machine in id order.
//!
//! Downstream reporting groups these by day and by machine id. The event
//! vocabulary is the closed [`EventKind`] enum, so consumers match on
//! variants instead of parsing text.
//!
//! # Example
//!
//! ```rust
//! use maintenance_simulator_core_rs::models::{EventKind, MachineEvent};
//!
//! let event = MachineEvent {
//!     machine_id: 3,
//!     kind: EventKind::MinorFailure,
//!     profit_delta: -2000.0,
//! };
//!
//! assert!(event.kind.is_failure());
//! assert_eq!(event.kind.to_string(), "minor failure");
//! ```

use crate::failure::Severity;
use crate::models::machine::MachineId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to one machine on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "operating")]
    Operating,
    #[serde(rename = "preventive stand-down")]
    PreventiveStandDown,
    #[serde(rename = "recovering")]
    Recovering,
    #[serde(rename = "minor failure")]
    MinorFailure,
    #[serde(rename = "major failure")]
    MajorFailure,
    #[serde(rename = "total-replacement failure")]
    TotalReplacementFailure,
}

impl EventKind {
    /// Every kind, in a fixed reporting order
    pub const ALL: [EventKind; 6] = [
        EventKind::Operating,
        EventKind::PreventiveStandDown,
        EventKind::Recovering,
        EventKind::MinorFailure,
        EventKind::MajorFailure,
        EventKind::TotalReplacementFailure,
    ];

    /// Failure event for a severity
    pub fn failure(severity: Severity) -> Self {
        match severity {
            Severity::Minor => EventKind::MinorFailure,
            Severity::Major => EventKind::MajorFailure,
            Severity::TotalReplacement => EventKind::TotalReplacementFailure,
        }
    }

    /// Severity of a failure event, `None` for non-failure kinds
    pub fn severity(self) -> Option<Severity> {
        match self {
            EventKind::MinorFailure => Some(Severity::Minor),
            EventKind::MajorFailure => Some(Severity::Major),
            EventKind::TotalReplacementFailure => Some(Severity::TotalReplacement),
            _ => None,
        }
    }

    pub fn is_failure(self) -> bool {
        self.severity().is_some()
    }

    /// Stable human-readable label
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Operating => "operating",
            EventKind::PreventiveStandDown => "preventive stand-down",
            EventKind::Recovering => "recovering",
            EventKind::MinorFailure => "minor failure",
            EventKind::MajorFailure => "major failure",
            EventKind::TotalReplacementFailure => "total-replacement failure",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One machine's outcome for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineEvent {
    pub machine_id: MachineId,
    pub kind: EventKind,
    pub profit_delta: f64,
}

/// Where a day's strategy came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DecisionSource {
    /// Operate-everything baseline
    Baseline,
    /// Winner of the genetic search, with its final fresh fitness
    Optimized { fitness: f64 },
    /// Caller-supplied strategy
    Fixed,
}

/// Immutable record of one simulated day
///
/// Fields are read-only once the record is built; the engine only appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    day: usize,
    net_profit: f64,
    source: DecisionSource,
    events: Vec<MachineEvent>,
}

impl DayRecord {
    /// Build a record; net profit is the sum of the event deltas
    pub fn new(day: usize, source: DecisionSource, events: Vec<MachineEvent>) -> Self {
        let net_profit = events.iter().map(|e| e.profit_delta).sum();
        Self {
            day,
            net_profit,
            source,
            events,
        }
    }

    pub fn day(&self) -> usize {
        self.day
    }

    pub fn net_profit(&self) -> f64 {
        self.net_profit
    }

    pub fn source(&self) -> DecisionSource {
        self.source
    }

    /// Per-machine events in machine id order
    pub fn events(&self) -> &[MachineEvent] {
        &self.events
    }

    pub fn event_for(&self, machine_id: MachineId) -> Option<&MachineEvent> {
        self.events.iter().find(|e| e.machine_id == machine_id)
    }

    pub fn failure_count(&self) -> usize {
        self.events.iter().filter(|e| e.kind.is_failure()).count()
    }

    pub fn count_of(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }
}

/// Append-only sequence of day records
///
/// Wraps `Vec<DayRecord>`; there is no way to modify or remove a record once
/// it has been appended.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DayLog {
    records: Vec<DayRecord>,
}

impl DayLog {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append the next day
    ///
    /// # Panics
    /// Panics if the record's day index is not the next in sequence.
    pub fn append(&mut self, record: DayRecord) {
        assert_eq!(
            record.day(),
            self.records.len(),
            "day records must be appended in day order"
        );
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    pub fn get(&self, day: usize) -> Option<&DayRecord> {
        self.records.get(day)
    }

    pub fn last(&self) -> Option<&DayRecord> {
        self.records.last()
    }

    /// Sum of every day's net profit
    pub fn total_profit(&self) -> f64 {
        self.records.iter().map(|r| r.net_profit()).sum()
    }

    /// All events for one machine across the run, in day order
    pub fn events_for_machine(&self, machine_id: MachineId) -> Vec<(usize, &MachineEvent)> {
        self.records
            .iter()
            .filter_map(|r| r.event_for(machine_id).map(|e| (r.day(), e)))
            .collect()
    }

    pub fn into_records(self) -> Vec<DayRecord> {
        self.records
    }
}
