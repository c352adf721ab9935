//! Problem builder: employees × days × shift types → [`RosterModel`].
//!
//! Generates the hard-constraint families of one month block:
//!
//! | Family | Constraint |
//! |--------|------------|
//! | TotalLoad | `Σ_{d,s} x[e,d,s] = quota` per employee |
//! | OneShiftPerDay | `Σ_s x[e,d,s] ≤ 1` per employee and day |
//! | MaxConsecutive | `Σ_{d..d+w, s} x[e,·,s] ≤ w-1` per employee and sliding window |
//! | Coverage | `Σ_e x[e,d,s] ≥ min_staff` per slot |
//! | CoverageCap | `Σ_e x[e,d,s] ≤ max_staff` per slot (optional) |
//! | RestrictedContinuation | `x[e,d,r] + Σ_{s≠r} x[e,d+1,s] ≤ 1` per restricted shift `r` |
//! | WeeklyRest | `Σ_{week, s} x[e,·,s] ≤ max_per_week` per non-overlapping week |
//!
//! The constraint set is built exactly once; both solving phases consume
//! the same [`RosterModel`] value.

use tracing::debug;

use crate::config::{RestrictedShift, RosterPolicy};
use crate::error::{Result, RosterError};
use crate::models::{Employee, Roster, ShiftType};
use crate::validation::validate_input;

use super::model::{Comparison, ConstraintFamily, LinearConstraint, RosterModel};

/// Last days of the previous block, per employee.
///
/// Only used when boundary carry-over is enabled. Each tail lists the shift
/// index worked on each of the previous block's final days (oldest first),
/// `None` for a day off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryHistory {
    tails: Vec<Vec<Option<usize>>>,
}

impl BoundaryHistory {
    /// Wraps per-employee tails (indexed like the employee slice).
    pub fn new(tails: Vec<Vec<Option<usize>>>) -> Self {
        Self { tails }
    }

    /// Extracts the last `tail_len` days of a block-local roster.
    ///
    /// `block_days` is the length of the block the roster covers.
    /// Shift ids not found in `shift_types` read as days off.
    pub fn from_roster(
        roster: &Roster,
        employees: &[Employee],
        shift_types: &[ShiftType],
        block_days: usize,
        tail_len: usize,
    ) -> Self {
        let tail_len = tail_len.min(block_days);
        let first = (block_days - tail_len) as u32;
        let tails = employees
            .iter()
            .map(|emp| {
                (first..block_days as u32)
                    .map(|day| {
                        roster
                            .shift_on(&emp.id, day)
                            .and_then(|sid| shift_types.iter().position(|s| s.id == sid))
                    })
                    .collect()
            })
            .collect();
        Self { tails }
    }

    /// Working days among the last `k` days of an employee's tail.
    pub fn worked_in_last(&self, employee: usize, k: usize) -> usize {
        self.tails.get(employee).map_or(0, |tail| {
            tail.iter().rev().take(k).filter(|d| d.is_some()).count()
        })
    }

    /// Shift worked on the previous block's final day.
    pub fn last_shift(&self, employee: usize) -> Option<usize> {
        self.tails
            .get(employee)
            .and_then(|tail| tail.last().copied().flatten())
    }
}

/// Policy counts converted to constraint right-hand sides.
struct RuleBounds {
    quota: i32,
    max_consecutive: i32,
    min_staff: i32,
    max_staff: Option<i32>,
    max_per_week: i32,
}

impl RuleBounds {
    fn from_policy(policy: &RosterPolicy) -> Result<Self> {
        Ok(Self {
            quota: rhs(policy.quota_days, "quota_days")?,
            max_consecutive: rhs(policy.max_consecutive_days, "max_consecutive_days")?,
            min_staff: rhs(policy.min_staff_per_shift, "min_staff_per_shift")?,
            max_staff: policy
                .max_staff_per_shift
                .map(|m| rhs(m, "max_staff_per_shift"))
                .transpose()?,
            max_per_week: rhs(policy.max_days_per_week, "max_days_per_week")?,
        })
    }
}

fn rhs(value: usize, field: &str) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| RosterError::Config(format!("{field} ({value}) is out of range")))
}

/// Builds the hard-constraint model of one month block.
///
/// # Example
/// ```
/// use u_roster::config::RosterPolicy;
/// use u_roster::models::{Employee, ShiftTime, ShiftType};
/// use u_roster::problem::RosterProblemBuilder;
///
/// let employees: Vec<_> = (1..=7).map(|i| Employee::anonymous(format!("E{i}"))).collect();
/// let shifts = vec![ShiftType::new("day", ShiftTime::hm(8, 0), ShiftTime::hm(16, 0))];
/// let model = RosterProblemBuilder::new(&employees, &shifts, 28)
///     .with_policy(RosterPolicy::default())
///     .build()
///     .unwrap();
/// assert_eq!(model.var_count(), 7 * 28);
/// ```
pub struct RosterProblemBuilder<'a> {
    employees: &'a [Employee],
    shift_types: &'a [ShiftType],
    days: usize,
    policy: RosterPolicy,
    history: Option<&'a BoundaryHistory>,
}

impl<'a> RosterProblemBuilder<'a> {
    /// Creates a builder for a block of `days` days with the default policy.
    pub fn new(employees: &'a [Employee], shift_types: &'a [ShiftType], days: usize) -> Self {
        Self {
            employees,
            shift_types,
            days,
            policy: RosterPolicy::default(),
            history: None,
        }
    }

    /// Sets the labor-rule policy.
    pub fn with_policy(mut self, policy: RosterPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Extends window constraints into the previous block's final days.
    pub fn with_history(mut self, history: &'a BoundaryHistory) -> Self {
        self.history = Some(history);
        self
    }

    /// Builds the model.
    ///
    /// # Errors
    /// `InvalidInput` for empty or duplicate employees/shift types and for a
    /// block shorter than the consecutive-work window. `Config` if the
    /// policy is inconsistent.
    pub fn build(&self) -> Result<RosterModel> {
        if let Err(errors) = validate_input(self.employees, self.shift_types) {
            let message = errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(RosterError::InvalidInput(message));
        }
        self.policy.validate()?;

        let window = self.policy.consecutive_window();
        if self.days < window {
            return Err(RosterError::InvalidInput(format!(
                "horizon of {} days is shorter than the {window}-day consecutive-work window",
                self.days
            )));
        }

        let mut model = RosterModel::new(self.employees.len(), self.days, self.shift_types.len());

        let bounds = RuleBounds::from_policy(&self.policy)?;
        self.add_total_load(&mut model, &bounds);
        self.add_one_shift_per_day(&mut model);
        self.add_max_consecutive(&mut model, &bounds);
        self.add_coverage(&mut model, &bounds);
        self.add_restricted_continuation(&mut model);
        self.add_weekly_rest(&mut model, &bounds);

        debug!(
            employees = model.employee_count(),
            days = model.day_count(),
            shifts = model.shift_count(),
            variables = model.var_count(),
            constraints = model.constraint_count(),
            carry_over = self.history.is_some(),
            "built roster model"
        );

        Ok(model)
    }

    /// Shift types matched by the policy's restricted markers.
    ///
    /// The first shift type with a matching start time is used. Markers
    /// with no match are skipped.
    pub fn restricted_shift_indices(&self) -> Vec<(usize, &RestrictedShift)> {
        let mut found: Vec<(usize, &RestrictedShift)> = Vec::new();
        for marker in &self.policy.restricted_shifts {
            if let Some(idx) = self.shift_types.iter().position(|s| s.starts_at(marker.start)) {
                if !found.iter().any(|(i, _)| *i == idx) {
                    found.push((idx, marker));
                }
            }
        }
        found
    }

    fn add_total_load(&self, model: &mut RosterModel, bounds: &RuleBounds) {
        let quota = bounds.quota;
        for e in 0..model.employee_count() {
            let vars: Vec<_> = (0..model.day_count())
                .flat_map(|d| model.day_vars(e, d).collect::<Vec<_>>())
                .collect();
            model.add_constraint(LinearConstraint::sum(
                ConstraintFamily::TotalLoad,
                vars,
                Comparison::Equal,
                quota,
            ));
        }
    }

    fn add_one_shift_per_day(&self, model: &mut RosterModel) {
        if model.shift_count() < 2 {
            return;
        }
        for e in 0..model.employee_count() {
            for d in 0..model.day_count() {
                let vars: Vec<_> = model.day_vars(e, d).collect();
                model.add_constraint(LinearConstraint::sum(
                    ConstraintFamily::OneShiftPerDay,
                    vars,
                    Comparison::LessEq,
                    1,
                ));
            }
        }
    }

    fn add_max_consecutive(&self, model: &mut RosterModel, bounds: &RuleBounds) {
        let window = self.policy.consecutive_window();
        let max = bounds.max_consecutive;

        for e in 0..model.employee_count() {
            for start in 0..=(model.day_count() - window) {
                let vars = self.window_vars(model, e, start, start + window);
                model.add_constraint(LinearConstraint::sum(
                    ConstraintFamily::MaxConsecutive,
                    vars,
                    Comparison::LessEq,
                    max,
                ));
            }

            // Windows that begin inside the previous block
            if let Some(history) = self.history {
                for k in 1..window {
                    // worked <= k < window, so it fits whenever max does
                    let worked = history.worked_in_last(e, k) as i32;
                    let vars = self.window_vars(model, e, 0, window - k);
                    model.add_constraint(LinearConstraint::sum(
                        ConstraintFamily::MaxConsecutive,
                        vars,
                        Comparison::LessEq,
                        max - worked,
                    ));
                }
            }
        }
    }

    fn add_coverage(&self, model: &mut RosterModel, bounds: &RuleBounds) {
        let min = bounds.min_staff;
        let max = bounds.max_staff;

        for d in 0..model.day_count() {
            for s in 0..model.shift_count() {
                let vars: Vec<_> = (0..model.employee_count())
                    .map(|e| model.var(e, d, s))
                    .collect();
                if min > 0 {
                    model.add_constraint(LinearConstraint::sum(
                        ConstraintFamily::Coverage,
                        vars.clone(),
                        Comparison::GreaterEq,
                        min,
                    ));
                }
                if let Some(max) = max {
                    model.add_constraint(LinearConstraint::sum(
                        ConstraintFamily::CoverageCap,
                        vars,
                        Comparison::LessEq,
                        max,
                    ));
                }
            }
        }
    }

    fn add_restricted_continuation(&self, model: &mut RosterModel) {
        if model.shift_count() < 2 {
            return;
        }
        for (r, _) in self.restricted_shift_indices() {
            for e in 0..model.employee_count() {
                for d in 0..model.day_count() - 1 {
                    let mut vars = vec![model.var(e, d, r)];
                    vars.extend((0..model.shift_count()).filter(|s| *s != r).map(|s| model.var(e, d + 1, s)));
                    model.add_constraint(LinearConstraint::sum(
                        ConstraintFamily::RestrictedContinuation,
                        vars,
                        Comparison::LessEq,
                        1,
                    ));
                }

                if self.history.and_then(|h| h.last_shift(e)) == Some(r) {
                    let vars: Vec<_> = (0..model.shift_count())
                        .filter(|s| *s != r)
                        .map(|s| model.var(e, 0, s))
                        .collect();
                    model.add_constraint(LinearConstraint::sum(
                        ConstraintFamily::RestrictedContinuation,
                        vars,
                        Comparison::LessEq,
                        0,
                    ));
                }
            }
        }
    }

    fn add_weekly_rest(&self, model: &mut RosterModel, bounds: &RuleBounds) {
        let week = self.policy.week_length_days;
        let max = bounds.max_per_week;
        for e in 0..model.employee_count() {
            for w in 0..model.day_count() / week {
                let vars = self.window_vars(model, e, w * week, (w + 1) * week);
                model.add_constraint(LinearConstraint::sum(
                    ConstraintFamily::WeeklyRest,
                    vars,
                    Comparison::LessEq,
                    max,
                ));
            }
        }
    }

    /// All shift variables of one employee on days `[from, to)`.
    fn window_vars(&self, model: &RosterModel, employee: usize, from: usize, to: usize) -> Vec<usize> {
        (from..to)
            .flat_map(|d| model.day_vars(employee, d).collect::<Vec<_>>())
            .collect()
    }
}
