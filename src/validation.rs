//! Input validation and roster auditing.
//!
//! [`validate_input`] checks structural integrity of the inputs before a
//! model is built. Detects:
//! - Empty employee or shift-type sets
//! - Duplicate IDs
//!
//! [`audit_roster`] re-checks a produced block-local roster against every
//! labor rule of a [`RosterPolicy`]. It works on the roster alone, without
//! the solver model, so it catches extraction or model-construction bugs.

use crate::config::RosterPolicy;
use crate::models::{Employee, Roster, ShiftType, Violation, ViolationType};
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No employees supplied.
    NoEmployees,
    /// No shift types supplied.
    NoShiftTypes,
    /// Two entities share the same ID.
    DuplicateId,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the inputs of a scheduling run.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(employees: &[Employee], shift_types: &[ShiftType]) -> ValidationResult {
    let mut errors = Vec::new();

    if employees.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoEmployees,
            "At least one employee is required",
        ));
    }
    if shift_types.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoShiftTypes,
            "At least one shift type is required",
        ));
    }

    let mut employee_ids = HashSet::new();
    for e in employees {
        if !employee_ids.insert(e.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate employee ID: {}", e.id),
            ));
        }
    }

    let mut shift_ids = HashSet::new();
    for s in shift_types {
        if !shift_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate shift type ID: {}", s.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Audits a block-local roster (days `0..days`) against the policy.
///
/// Rules are checked per block only; nothing is checked across block
/// boundaries. Returns every violation found, empty for a clean roster.
pub fn audit_roster(
    roster: &Roster,
    employees: &[Employee],
    shift_types: &[ShiftType],
    policy: &RosterPolicy,
    days: usize,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let days = days as u32;

    let known_employees: HashSet<&str> = employees.iter().map(|e| e.id.as_str()).collect();
    let known_shifts: HashSet<&str> = shift_types.iter().map(|s| s.id.as_str()).collect();

    for (emp, day, shift) in roster.iter() {
        if !known_employees.contains(emp) {
            violations.push(Violation::new(
                ViolationType::UnknownReference,
                emp,
                Some(day),
                format!("Unknown employee '{emp}'"),
            ));
        }
        if !known_shifts.contains(shift) {
            violations.push(Violation::new(
                ViolationType::UnknownReference,
                shift,
                Some(day),
                format!("Unknown shift type '{shift}' assigned to '{emp}'"),
            ));
        }
    }

    let window = policy.consecutive_window() as u32;
    let week = policy.week_length_days as u32;

    for emp in employees {
        let id = emp.id.as_str();

        let worked = roster.working_days_between(id, 0, days);
        if worked != policy.quota_days {
            violations.push(Violation::new(
                ViolationType::QuotaMismatch,
                id,
                None,
                format!("'{id}' works {worked} days, quota is {}", policy.quota_days),
            ));
        }

        if days >= window {
            for start in 0..=(days - window) {
                let count = roster.working_days_between(id, start, start + window);
                if count > policy.max_consecutive_days {
                    violations.push(Violation::new(
                        ViolationType::ConsecutiveWork,
                        id,
                        Some(start),
                        format!(
                            "'{id}' works {count} of {window} days from day {start}"
                        ),
                    ));
                }
            }
        }

        for w in 0..days / week {
            let from = w * week;
            let count = roster.working_days_between(id, from, from + week);
            if count > policy.max_days_per_week {
                violations.push(Violation::new(
                    ViolationType::WeeklyRest,
                    id,
                    Some(from),
                    format!("'{id}' works {count} days in week {}", w + 1),
                ));
            }
        }
    }

    // Coverage per (day, shift) slot
    for day in 0..days {
        let mut staffed: HashMap<&str, usize> = HashMap::new();
        for (_, shift) in roster.assignments_on(day) {
            *staffed.entry(shift).or_insert(0) += 1;
        }
        for s in shift_types {
            let count = staffed.get(s.id.as_str()).copied().unwrap_or(0);
            if count < policy.min_staff_per_shift {
                violations.push(Violation::new(
                    ViolationType::Coverage,
                    &s.id,
                    Some(day),
                    format!("'{}' on day {day} has {count} staff", s.id),
                ));
            }
            if let Some(max) = policy.max_staff_per_shift {
                if count > max {
                    violations.push(Violation::new(
                        ViolationType::CoverageCap,
                        &s.id,
                        Some(day),
                        format!("'{}' on day {day} has {count} staff, cap is {max}", s.id),
                    ));
                }
            }
        }
    }

    // Restricted shifts: first shift type matching each marker
    for marker in &policy.restricted_shifts {
        let Some(restricted) = shift_types.iter().find(|s| s.starts_at(marker.start)) else {
            continue;
        };
        for emp in employees {
            let id = emp.id.as_str();
            for day in 0..days.saturating_sub(1) {
                if roster.shift_on(id, day) != Some(restricted.id.as_str()) {
                    continue;
                }
                if let Some(next) = roster.shift_on(id, day + 1) {
                    if next != restricted.id {
                        violations.push(Violation::new(
                            ViolationType::RestrictedContinuation,
                            id,
                            Some(day),
                            format!(
                                "'{id}' works {} ({}) on day {day} then '{next}'",
                                marker.label, restricted.id
                            ),
                        ));
                    }
                }
            }
        }
    }

    violations
}
