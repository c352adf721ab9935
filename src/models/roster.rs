//! Roster (solution) model.
//!
//! A roster maps every employee to the shift type they work on each day
//! offset. Idle days have no entry. It may be audited into a list of
//! labor-rule violations.
//!
//! # Invariant
//! At most one shift type per employee and day. The map shape enforces it
//! structurally; the solver model enforces it through the one-shift-per-day
//! constraint family.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-employee day → shift-type map.
pub type DayShifts = BTreeMap<u32, String>;

/// A complete roster: employee id → day offset → shift-type id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    entries: BTreeMap<String, DayShifts>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an employee with no assignments (idle for the whole period).
    pub fn add_employee(&mut self, employee_id: impl Into<String>) {
        self.entries.entry(employee_id.into()).or_default();
    }

    /// Assigns a shift. Returns the previously assigned shift for that day, if any.
    pub fn assign(
        &mut self,
        employee_id: impl Into<String>,
        day: u32,
        shift_id: impl Into<String>,
    ) -> Option<String> {
        self.entries
            .entry(employee_id.into())
            .or_default()
            .insert(day, shift_id.into())
    }

    /// Shift type worked by an employee on a day, if any.
    pub fn shift_on(&self, employee_id: &str, day: u32) -> Option<&str> {
        self.entries
            .get(employee_id)
            .and_then(|days| days.get(&day))
            .map(String::as_str)
    }

    /// Day map for one employee.
    pub fn days_for(&self, employee_id: &str) -> Option<&DayShifts> {
        self.entries.get(employee_id)
    }

    /// Number of days an employee works.
    pub fn working_days(&self, employee_id: &str) -> usize {
        self.entries.get(employee_id).map_or(0, BTreeMap::len)
    }

    /// Number of working days an employee has inside `[from, to)`.
    pub fn working_days_between(&self, employee_id: &str, from: u32, to: u32) -> usize {
        self.entries
            .get(employee_id)
            .map_or(0, |days| days.range(from..to).count())
    }

    /// Employee ids in ascending order.
    pub fn employee_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of employees present (including idle ones).
    pub fn employee_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of (employee, day) assignments.
    pub fn assignment_count(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// Whether no assignments exist.
    pub fn is_empty(&self) -> bool {
        self.assignment_count() == 0
    }

    /// `(employee, shift)` pairs working on a given day.
    pub fn assignments_on(&self, day: u32) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(emp, days)| days.get(&day).map(|s| (emp.as_str(), s.as_str())))
            .collect()
    }

    /// Lowest and highest assigned day offsets.
    pub fn day_span(&self) -> Option<(u32, u32)> {
        let first = self
            .entries
            .values()
            .filter_map(|days| days.keys().next().copied())
            .min()?;
        let last = self
            .entries
            .values()
            .filter_map(|days| days.keys().next_back().copied())
            .max()?;
        Some((first, last))
    }

    /// Iterates `(employee, day, shift)` tuples in employee, then day order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32, &str)> {
        self.entries.iter().flat_map(|(emp, days)| {
            days.iter()
                .map(move |(day, shift)| (emp.as_str(), *day, shift.as_str()))
        })
    }

    /// Returns a copy with every day offset shifted by `days`.
    pub fn offset_days(&self, days: u32) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(emp, map)| {
                let shifted = map
                    .iter()
                    .map(|(day, shift)| (day + days, shift.clone()))
                    .collect();
                (emp.clone(), shifted)
            })
            .collect();
        Self { entries }
    }

    /// Merges another roster into this one. Entries of `other` win on
    /// (employee, day) collisions.
    pub fn merge(&mut self, other: Roster) {
        for (emp, days) in other.entries {
            self.entries.entry(emp).or_default().extend(days);
        }
    }
}

/// A labor-rule violation found in a roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity ID (employee or shift type).
    pub entity_id: String,
    /// First day offset the violation concerns, if day-specific.
    pub day: Option<u32>,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of roster violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Employee does not work exactly the quota of days in the block.
    QuotaMismatch,
    /// Too many working days in a sliding window.
    ConsecutiveWork,
    /// A (day, shift) slot is understaffed.
    Coverage,
    /// A (day, shift) slot is overstaffed.
    CoverageCap,
    /// A restricted shift was followed by a different shift the next day.
    RestrictedContinuation,
    /// Too many working days in a calendar week of the block.
    WeeklyRest,
    /// Roster references an employee or shift type not in the input.
    UnknownReference,
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        day: Option<u32>,
        message: impl Into<String>,
    ) -> Self {
        let severity = match violation_type {
            ViolationType::Coverage | ViolationType::UnknownReference => 95,
            ViolationType::QuotaMismatch => 80,
            ViolationType::ConsecutiveWork | ViolationType::WeeklyRest => 70,
            ViolationType::RestrictedContinuation => 60,
            ViolationType::CoverageCap => 40,
        };
        Self {
            violation_type,
            entity_id: entity_id.into(),
            day,
            message: message.into(),
            severity,
        }
    }
}
