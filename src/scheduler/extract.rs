//! Schedule extraction: solved variables → [`Roster`].

use crate::models::{Employee, Roster, ShiftType};
use crate::problem::{Assignment, RosterModel};

/// Converts an assignment into a block-local roster (days `0..model.day_count()`).
///
/// Every employee gets an entry, idle ones with an empty day map. If an
/// assignment ever had two true shifts for the same employee and day, the
/// one with the lowest shift index is kept; solved assignments never do,
/// because the model forbids it.
pub fn extract_roster(
    model: &RosterModel,
    assignment: &Assignment,
    employees: &[Employee],
    shift_types: &[ShiftType],
) -> Roster {
    let mut roster = Roster::new();
    for (e, employee) in employees.iter().enumerate().take(model.employee_count()) {
        roster.add_employee(employee.id.as_str());
        for d in 0..model.day_count() {
            let worked = (0..model.shift_count().min(shift_types.len()))
                .find(|&s| assignment.value(model.var(e, d, s)));
            if let Some(s) = worked {
                roster.assign(employee.id.as_str(), d as u32, shift_types[s].id.as_str());
            }
        }
    }
    roster
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShiftTime;

    fn setup() -> (RosterModel, Vec<Employee>, Vec<ShiftType>) {
        let employees = vec![Employee::anonymous("E1"), Employee::anonymous("E2")];
        let shifts = vec![
            ShiftType::new("day", ShiftTime::hm(8, 0), ShiftTime::hm(16, 0)),
            ShiftType::new("night", ShiftTime::hm(22, 0), ShiftTime::hm(6, 0)),
        ];
        (RosterModel::new(2, 5, 2), employees, shifts)
    }

    #[test]
    fn test_extract_assignments() {
        let (model, employees, shifts) = setup();
        let mut a = Assignment::empty(model.var_count());
        a.set(model.var(0, 0, 0), true);
        a.set(model.var(0, 3, 1), true);
        a.set(model.var(1, 4, 1), true);

        let roster = extract_roster(&model, &a, &employees, &shifts);
        assert_eq!(roster.employee_count(), 2);
        assert_eq!(roster.assignment_count(), 3);
        assert_eq!(roster.shift_on("E1", 0), Some("day"));
        assert_eq!(roster.shift_on("E1", 3), Some("night"));
        assert_eq!(roster.shift_on("E2", 4), Some("night"));
        assert_eq!(roster.shift_on("E2", 0), None);
    }

    #[test]
    fn test_idle_employee_has_entry() {
        let (model, employees, shifts) = setup();
        let roster = extract_roster(&model, &Assignment::empty(model.var_count()), &employees, &shifts);
        assert_eq!(roster.employee_count(), 2);
        assert!(roster.is_empty());
        assert!(roster.days_for("E2").unwrap().is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let (model, employees, shifts) = setup();
        let mut a = Assignment::empty(model.var_count());
        for d in 0..5 {
            a.set(model.var(d % 2, d, 1 - d % 2), true);
        }
        let first = extract_roster(&model, &a, &employees, &shifts);
        let second = extract_roster(&model, &a, &employees, &shifts);
        assert_eq!(first, second);
    }
}
