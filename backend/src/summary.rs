//! Run summaries
//!
//! Pure aggregation over a [`DayRecord`] sequence: per-machine totals, the
//! cumulative profit curve, and discounted value. Nothing here renders or
//! writes files.

use crate::models::{DayRecord, EventKind, FailureCounts, MachineId};
use crate::orchestrator::{ComparisonOutcome, RunOutcome};
use crate::policy::PolicyMode;
use serde::Serialize;

/// Totals for one machine over a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MachineSummary {
    pub machine_id: MachineId,
    pub net_profit: f64,
    pub failures: FailureCounts,
    pub preventive_stand_downs: u32,
    pub operating_days: u32,
    pub recovering_days: u32,
}

impl MachineSummary {
    fn empty(machine_id: MachineId) -> Self {
        Self {
            machine_id,
            net_profit: 0.0,
            failures: FailureCounts::default(),
            preventive_stand_downs: 0,
            operating_days: 0,
            recovering_days: 0,
        }
    }

    fn record(&mut self, kind: EventKind, profit_delta: f64) {
        self.net_profit += profit_delta;
        match kind {
            EventKind::Operating => self.operating_days += 1,
            EventKind::PreventiveStandDown => self.preventive_stand_downs += 1,
            EventKind::Recovering => self.recovering_days += 1,
            failure => {
                if let Some(severity) = failure.severity() {
                    self.failures.record(severity);
                }
            }
        }
    }
}

/// Per-machine totals, indexed by machine id
///
/// Machines that never appear in a record are absent; ids are assumed dense.
pub fn summarize_machines(records: &[DayRecord]) -> Vec<MachineSummary> {
    let machine_count = records
        .iter()
        .flat_map(|r| r.events())
        .map(|e| e.machine_id + 1)
        .max()
        .unwrap_or(0);

    let mut summaries: Vec<MachineSummary> = (0..machine_count).map(MachineSummary::empty).collect();
    for event in records.iter().flat_map(|r| r.events()) {
        summaries[event.machine_id].record(event.kind, event.profit_delta);
    }
    summaries
}

/// Running total of fleet profit after each day
pub fn cumulative_profit(records: &[DayRecord]) -> Vec<f64> {
    records
        .iter()
        .scan(0.0, |total, record| {
            *total += record.net_profit();
            Some(*total)
        })
        .collect()
}

/// Fleet profit discounted back to day 0
///
/// ```text
/// NPV = Σ_d net_profit_d / (1 + r)^d
/// ```
pub fn net_present_value(records: &[DayRecord], daily_discount_rate: f64) -> f64 {
    records
        .iter()
        .map(|r| r.net_profit() / (1.0 + daily_discount_rate).powf(r.day() as f64))
        .sum()
}

/// Headline numbers for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub mode: PolicyMode,
    pub days: usize,
    pub total_profit: f64,
    pub net_present_value: f64,
    pub failures: FailureCounts,
    pub preventive_stand_downs: u32,
    pub recovering_days: u32,
    pub machines: Vec<MachineSummary>,
}

impl RunSummary {
    pub fn from_outcome(outcome: &RunOutcome, daily_discount_rate: f64) -> Self {
        let machines = summarize_machines(&outcome.records);
        let mut failures = FailureCounts::default();
        for machine in &machines {
            failures.minor += machine.failures.minor;
            failures.major += machine.failures.major;
            failures.total_replacement += machine.failures.total_replacement;
        }

        Self {
            mode: outcome.mode,
            days: outcome.records.len(),
            total_profit: outcome.total_profit,
            net_present_value: net_present_value(&outcome.records, daily_discount_rate),
            failures,
            preventive_stand_downs: machines.iter().map(|m| m.preventive_stand_downs).sum(),
            recovering_days: machines.iter().map(|m| m.recovering_days).sum(),
            machines,
        }
    }
}

/// Side-by-side summary of a comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub initial_fingerprint: String,
    pub policy: RunSummary,
    pub baseline: RunSummary,
    pub profit_advantage: f64,
}

impl ComparisonSummary {
    pub fn from_outcome(outcome: &ComparisonOutcome, daily_discount_rate: f64) -> Self {
        Self {
            initial_fingerprint: outcome.initial_fingerprint.clone(),
            policy: RunSummary::from_outcome(&outcome.policy, daily_discount_rate),
            baseline: RunSummary::from_outcome(&outcome.baseline, daily_discount_rate),
            profit_advantage: outcome.profit_advantage(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DecisionSource, MachineEvent};

    fn event(machine_id: MachineId, kind: EventKind, profit_delta: f64) -> MachineEvent {
        MachineEvent {
            machine_id,
            kind,
            profit_delta,
        }
    }

    #[test]
    fn test_cumulative_profit() {
        let records = vec![
            DayRecord::new(0, DecisionSource::Baseline, vec![event(0, EventKind::Operating, 100.0)]),
            DayRecord::new(1, DecisionSource::Baseline, vec![event(0, EventKind::MinorFailure, -2000.0)]),
        ];
        assert_eq!(cumulative_profit(&records), vec![100.0, -1900.0]);
    }

    #[test]
    fn test_npv_zero_rate_is_total() {
        let records = vec![
            DayRecord::new(0, DecisionSource::Baseline, vec![event(0, EventKind::Operating, 100.0)]),
            DayRecord::new(1, DecisionSource::Baseline, vec![event(0, EventKind::Operating, 100.0)]),
        ];
        assert_eq!(net_present_value(&records, 0.0), 200.0);
        assert!((net_present_value(&records, 0.1) - (100.0 + 100.0 / 1.1)).abs() < 1e-9);
    }

    #[test]
    fn test_npv_far_day_index() {
        let day = i32::MAX as usize + 10;
        let records = vec![DayRecord::new(day, DecisionSource::Baseline, vec![event(0, EventKind::Operating, 100.0)])];
        let npv = net_present_value(&records, 0.01);
        assert!(npv >= 0.0 && npv < 1e-9, "far-future profit discounts toward zero, got {}", npv);
    }
}
