//! Solver-neutral roster model.
//!
//! One boolean variable per `(employee, day, shift)` triple, and linear
//! constraints over those variables. Backends translate this model into
//! their own representation; nothing here depends on a solver library.

use serde::{Deserialize, Serialize};

/// Dense index of a decision variable.
pub type VarId = usize;

/// Constraint family a linear constraint was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintFamily {
    /// Working days per employee equal the quota.
    TotalLoad,
    /// At most one shift per employee and day.
    OneShiftPerDay,
    /// Sliding-window cap on working days.
    MaxConsecutive,
    /// Minimum staff per (day, shift) slot.
    Coverage,
    /// Maximum staff per (day, shift) slot.
    CoverageCap,
    /// A restricted shift is followed by itself or a day off.
    RestrictedContinuation,
    /// Non-overlapping weekly cap on working days.
    WeeklyRest,
}

/// Relational operator of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    /// `lhs <= rhs`
    LessEq,
    /// `lhs >= rhs`
    GreaterEq,
    /// `lhs == rhs`
    Equal,
}

/// `sum(coef * var) <op> rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// Originating family.
    pub family: ConstraintFamily,
    /// `(variable, coefficient)` terms.
    pub terms: Vec<(VarId, i32)>,
    /// Relational operator.
    pub comparison: Comparison,
    /// Right-hand side.
    pub rhs: i32,
}

impl LinearConstraint {
    /// Creates a constraint whose terms all have coefficient 1.
    pub fn sum(
        family: ConstraintFamily,
        vars: impl IntoIterator<Item = VarId>,
        comparison: Comparison,
        rhs: i32,
    ) -> Self {
        Self {
            family,
            terms: vars.into_iter().map(|v| (v, 1)).collect(),
            comparison,
            rhs,
        }
    }

    /// Left-hand side value under an assignment.
    pub fn lhs(&self, assignment: &Assignment) -> i32 {
        self.terms
            .iter()
            .filter(|(var, _)| assignment.value(*var))
            .map(|(_, coef)| coef)
            .sum()
    }

    /// Whether the assignment satisfies this constraint.
    pub fn is_satisfied(&self, assignment: &Assignment) -> bool {
        let lhs = self.lhs(assignment);
        match self.comparison {
            Comparison::LessEq => lhs <= self.rhs,
            Comparison::GreaterEq => lhs >= self.rhs,
            Comparison::Equal => lhs == self.rhs,
        }
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    Maximise,
    Minimise,
}

/// Linear objective `constant + sum(coef * var)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub sense: Sense,
    pub terms: Vec<(VarId, i32)>,
    pub constant: i32,
}

impl Objective {
    /// Objective value under an assignment.
    pub fn evaluate(&self, assignment: &Assignment) -> i64 {
        let variable: i64 = self
            .terms
            .iter()
            .filter(|(var, _)| assignment.value(*var))
            .map(|(_, coef)| *coef as i64)
            .sum();
        self.constant as i64 + variable
    }

    /// Smallest and largest values the objective can take over booleans.
    pub fn bounds(&self) -> (i64, i64) {
        let (mut lo, mut hi) = (self.constant as i64, self.constant as i64);
        for &(_, coef) in &self.terms {
            if coef < 0 {
                lo += coef as i64;
            } else {
                hi += coef as i64;
            }
        }
        (lo, hi)
    }
}

/// A full truth assignment of the decision variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    values: Vec<bool>,
}

impl Assignment {
    /// Wraps a dense value vector.
    pub fn from_values(values: Vec<bool>) -> Self {
        Self { values }
    }

    /// All-false assignment of the given size.
    pub fn empty(var_count: usize) -> Self {
        Self {
            values: vec![false; var_count],
        }
    }

    /// Value of a variable. Out-of-range variables read as false.
    #[inline]
    pub fn value(&self, var: VarId) -> bool {
        self.values.get(var).copied().unwrap_or(false)
    }

    /// Sets a variable.
    pub fn set(&mut self, var: VarId, value: bool) {
        if let Some(slot) = self.values.get_mut(var) {
            *slot = value;
        }
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the assignment has no variables.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of true variables.
    pub fn true_count(&self) -> usize {
        self.values.iter().filter(|v| **v).count()
    }

    /// Number of positions with the same truth value as `other`.
    pub fn agreement(&self, other: &Assignment) -> usize {
        self.values
            .iter()
            .zip(&other.values)
            .filter(|(a, b)| a == b)
            .count()
    }

    /// Raw values.
    pub fn values(&self) -> &[bool] {
        &self.values
    }
}

/// Variables and hard constraints for one month block.
///
/// Built once per block and shared, unchanged, by the feasibility and the
/// stability phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterModel {
    employees: usize,
    days: usize,
    shifts: usize,
    constraints: Vec<LinearConstraint>,
}

impl RosterModel {
    /// Creates a model with no constraints.
    pub fn new(employees: usize, days: usize, shifts: usize) -> Self {
        Self {
            employees,
            days,
            shifts,
            constraints: Vec::new(),
        }
    }

    /// Variable for `(employee, day, shift)`.
    #[inline]
    pub fn var(&self, employee: usize, day: usize, shift: usize) -> VarId {
        debug_assert!(employee < self.employees && day < self.days && shift < self.shifts);
        (employee * self.days + day) * self.shifts + shift
    }

    /// Inverse of [`RosterModel::var`].
    pub fn decode(&self, var: VarId) -> (usize, usize, usize) {
        let shift = var % self.shifts;
        let rest = var / self.shifts;
        (rest / self.days, rest % self.days, shift)
    }

    /// Variables of one employee on one day, across all shifts.
    pub fn day_vars(&self, employee: usize, day: usize) -> impl Iterator<Item = VarId> + '_ {
        (0..self.shifts).map(move |s| self.var(employee, day, s))
    }

    /// Number of employees.
    pub fn employee_count(&self) -> usize {
        self.employees
    }

    /// Number of days.
    pub fn day_count(&self) -> usize {
        self.days
    }

    /// Number of shift types.
    pub fn shift_count(&self) -> usize {
        self.shifts
    }

    /// Number of decision variables.
    pub fn var_count(&self) -> usize {
        self.employees * self.days * self.shifts
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// All constraints.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Constraints generated by one family.
    pub fn constraints_of(
        &self,
        family: ConstraintFamily,
    ) -> impl Iterator<Item = &LinearConstraint> + '_ {
        self.constraints.iter().filter(move |c| c.family == family)
    }

    /// Constraints the assignment violates. A size mismatch violates everything.
    pub fn violations<'a>(&'a self, assignment: &Assignment) -> Vec<&'a LinearConstraint> {
        if assignment.len() != self.var_count() {
            return self.constraints.iter().collect();
        }
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied(assignment))
            .collect()
    }

    /// Whether the assignment satisfies every constraint.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        assignment.len() == self.var_count()
            && self.constraints.iter().all(|c| c.is_satisfied(assignment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_indexing_roundtrip() {
        let model = RosterModel::new(3, 5, 2);
        assert_eq!(model.var_count(), 30);
        assert_eq!(model.var(0, 0, 0), 0);
        assert_eq!(model.var(0, 0, 1), 1);
        assert_eq!(model.var(0, 1, 0), 2);
        assert_eq!(model.var(1, 0, 0), 10);
        for var in 0..model.var_count() {
            let (e, d, s) = model.decode(var);
            assert_eq!(model.var(e, d, s), var);
        }
    }

    #[test]
    fn test_constraint_evaluation() {
        let mut a = Assignment::empty(4);
        a.set(0, true);
        a.set(2, true);

        let le = LinearConstraint::sum(ConstraintFamily::MaxConsecutive, [0, 1, 2], Comparison::LessEq, 1);
        assert_eq!(le.lhs(&a), 2);
        assert!(!le.is_satisfied(&a));

        let ge = LinearConstraint::sum(ConstraintFamily::Coverage, [2, 3], Comparison::GreaterEq, 1);
        assert!(ge.is_satisfied(&a));

        let eq = LinearConstraint::sum(ConstraintFamily::TotalLoad, [0, 1, 2, 3], Comparison::Equal, 2);
        assert!(eq.is_satisfied(&a));
    }

    #[test]
    fn test_model_violations() {
        let mut model = RosterModel::new(1, 2, 1);
        model.add_constraint(LinearConstraint::sum(
            ConstraintFamily::Coverage,
            [0],
            Comparison::GreaterEq,
            1,
        ));
        model.add_constraint(LinearConstraint::sum(
            ConstraintFamily::Coverage,
            [1],
            Comparison::GreaterEq,
            1,
        ));

        let mut a = Assignment::empty(2);
        a.set(0, true);
        assert_eq!(model.violations(&a).len(), 1);
        a.set(1, true);
        assert!(model.is_satisfied_by(&a));
        assert_eq!(model.constraints_of(ConstraintFamily::Coverage).count(), 2);

        // Wrong size is never accepted
        assert!(!model.is_satisfied_by(&Assignment::empty(3)));
    }

    #[test]
    fn test_agreement() {
        let a = Assignment::from_values(vec![true, false, true, false]);
        let b = Assignment::from_values(vec![true, true, false, false]);
        assert_eq!(a.agreement(&b), 2);
        assert_eq!(a.agreement(&a), 4);
        assert_eq!(a.true_count(), 2);
    }

    #[test]
    fn test_objective_bounds_and_value() {
        let objective = Objective {
            sense: Sense::Maximise,
            terms: vec![(0, 1), (1, -1), (2, 1)],
            constant: 1,
        };
        assert_eq!(objective.bounds(), (0, 3));
        let a = Assignment::from_values(vec![true, false, true]);
        assert_eq!(objective.evaluate(&a), 3);
    }
}
