//! Roster quality metrics (KPIs).
//!
//! Computes workload and staffing indicators from a roster.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Working days | Days with any shift, per employee |
//! | Working hours | Sum of shift durations, per employee |
//! | Slot staffing | Employees per (day, shift) slot: min / max / mean |
//! | Workload spread | Max − min working days across employees |
//!
//! These describe the result; they are not optimised. The stability
//! objective measures agreement with a baseline, not equity.

use std::collections::HashMap;

use crate::models::{Roster, ShiftType};

/// Roster performance indicators.
#[derive(Debug, Clone)]
pub struct RosterKpi {
    /// Working days per employee.
    pub working_days: HashMap<String, usize>,
    /// Working hours per employee.
    pub working_hours: HashMap<String, f64>,
    /// Fewest employees on any (day, shift) slot.
    pub min_slot_staff: usize,
    /// Most employees on any (day, shift) slot.
    pub max_slot_staff: usize,
    /// Mean employees per (day, shift) slot.
    pub avg_slot_staff: f64,
    /// Total (employee, day) assignments.
    pub total_assignments: usize,
}

impl RosterKpi {
    /// Computes KPIs over days `0..days`.
    ///
    /// # Arguments
    /// * `roster` - Roster to evaluate (block-local or horizon offsets).
    /// * `shift_types` - Shift types (for durations and slots).
    /// * `days` - Number of days to count slots over.
    pub fn calculate(roster: &Roster, shift_types: &[ShiftType], days: u32) -> Self {
        let hours_by_shift: HashMap<&str, f64> = shift_types
            .iter()
            .map(|s| (s.id.as_str(), s.duration_hours()))
            .collect();

        let mut working_days = HashMap::new();
        let mut working_hours = HashMap::new();
        for emp in roster.employee_ids() {
            working_days.insert(emp.to_string(), roster.working_days_between(emp, 0, days));
            let hours: f64 = roster
                .days_for(emp)
                .into_iter()
                .flat_map(|map| map.range(0..days))
                .filter_map(|(_, shift)| hours_by_shift.get(shift.as_str()))
                .sum();
            working_hours.insert(emp.to_string(), hours);
        }

        let mut slot_counts: HashMap<(u32, &str), usize> = HashMap::new();
        let mut total_assignments = 0;
        for (_, day, shift) in roster.iter().filter(|(_, day, _)| *day < days) {
            *slot_counts.entry((day, shift)).or_insert(0) += 1;
            total_assignments += 1;
        }

        let slots: Vec<usize> = (0..days)
            .flat_map(|d| shift_types.iter().map(move |s| (d, s.id.as_str())))
            .map(|slot| slot_counts.get(&slot).copied().unwrap_or(0))
            .collect();

        let avg_slot_staff = if slots.is_empty() {
            0.0
        } else {
            slots.iter().sum::<usize>() as f64 / slots.len() as f64
        };

        Self {
            working_days,
            working_hours,
            min_slot_staff: slots.iter().copied().min().unwrap_or(0),
            max_slot_staff: slots.iter().copied().max().unwrap_or(0),
            avg_slot_staff,
            total_assignments,
        }
    }

    /// Difference between the busiest and the least busy employee, in days.
    pub fn workload_spread(&self) -> usize {
        let max = self.working_days.values().max().copied().unwrap_or(0);
        let min = self.working_days.values().min().copied().unwrap_or(0);
        max - min
    }

    /// Whether every slot has at least `min_staff` employees.
    pub fn meets_coverage(&self, min_staff: usize) -> bool {
        self.min_slot_staff >= min_staff
    }
}
