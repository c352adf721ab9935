//! Feasibility phase: any assignment satisfying every hard constraint.

use tracing::{debug, warn};

use crate::error::{Result, RosterError};
use crate::problem::{Assignment, RosterModel};
use crate::solver::{BackendKind, SolveLimits, SolveStatus, SolverBackend};

/// Finds a baseline assignment for a [`RosterModel`].
///
/// Which of several valid assignments is returned is up to the backend and
/// may change between runs or versions.
#[derive(Debug)]
pub struct FeasibilitySolver {
    backend: Box<dyn SolverBackend>,
    limits: SolveLimits,
}

impl FeasibilitySolver {
    /// Creates a solver on the given backend.
    pub fn new(backend: Box<dyn SolverBackend>) -> Self {
        Self {
            backend,
            limits: SolveLimits::default(),
        }
    }

    /// Creates a solver from a backend selector.
    pub fn with_kind(kind: BackendKind) -> Self {
        Self::new(kind.backend())
    }

    /// Sets solver limits.
    pub fn with_limits(mut self, limits: SolveLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Solves the model without objective.
    ///
    /// # Errors
    /// `Infeasible` when the constraints are unsatisfiable, when the time
    /// limit expires first, or when the backend returns values that do not
    /// satisfy the model.
    pub fn solve(&self, model: &RosterModel) -> Result<Assignment> {
        let outcome = self.backend.solve(model, None, &self.limits);
        debug!(
            backend = self.backend.name(),
            status = ?outcome.status,
            "feasibility phase finished"
        );

        match (outcome.status, outcome.assignment) {
            (SolveStatus::Optimal | SolveStatus::Feasible, Some(assignment)) => {
                let violated = model.violations(&assignment).len();
                if violated > 0 {
                    warn!(
                        backend = self.backend.name(),
                        violated, "backend returned a non-satisfying assignment"
                    );
                    return Err(RosterError::Infeasible(format!(
                        "{} backend returned an assignment violating {violated} constraints",
                        self.backend.name()
                    )));
                }
                Ok(assignment)
            }
            (status, _) => Err(RosterError::Infeasible(format!(
                "{} backend: {}",
                self.backend.name(),
                outcome
                    .detail
                    .unwrap_or_else(|| format!("{status:?} without assignment"))
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, ShiftTime, ShiftType};
    use crate::problem::{ConstraintFamily, RosterProblemBuilder};
    use crate::solver::SolveOutcome;
    use crate::problem::Objective;

    /// Backend that always answers with a fixed outcome.
    #[derive(Debug)]
    struct Scripted(SolveStatus, Option<Assignment>);

    impl SolverBackend for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn solve(&self, _: &RosterModel, _: Option<&Objective>, _: &SolveLimits) -> SolveOutcome {
            SolveOutcome {
                status: self.0,
                assignment: self.1.clone(),
                detail: None,
            }
        }
    }

    #[test]
    fn test_single_employee_is_infeasible() {
        let employees = vec![Employee::anonymous("E1")];
        let shifts = vec![ShiftType::new("day", ShiftTime::hm(8, 0), ShiftTime::hm(16, 0))];
        let model = RosterProblemBuilder::new(&employees, &shifts, 28).build().unwrap();

        for kind in [BackendKind::Cp, BackendKind::Lp] {
            let err = FeasibilitySolver::with_kind(kind).solve(&model).unwrap_err();
            assert!(err.is_infeasible(), "{kind:?}: {err}");
        }
    }

    #[test]
    fn test_small_instance_is_feasible() {
        let employees: Vec<_> = (1..=3).map(|i| Employee::anonymous(format!("E{i}"))).collect();
        let shifts = vec![ShiftType::new("day", ShiftTime::hm(8, 0), ShiftTime::hm(16, 0))];
        let policy = crate::config::RosterPolicy {
            block_length_days: 8,
            quota_days: 4,
            ..Default::default()
        };
        let model = RosterProblemBuilder::new(&employees, &shifts, 8)
            .with_policy(policy)
            .build()
            .unwrap();

        for kind in [BackendKind::Cp, BackendKind::Lp] {
            let a = FeasibilitySolver::with_kind(kind).solve(&model).unwrap();
            assert!(model.is_satisfied_by(&a), "{kind:?}");
            assert_eq!(a.true_count(), 12);
        }
        assert_eq!(model.constraints_of(ConstraintFamily::TotalLoad).count(), 3);
    }

    #[test]
    fn test_default_backend_solves_full_block() {
        let employees: Vec<_> = (1..=7).map(|i| Employee::anonymous(format!("E{i}"))).collect();
        let shifts = vec![
            ShiftType::new("early", ShiftTime::hm(6, 0), ShiftTime::hm(14, 0)),
            ShiftType::new("day", ShiftTime::hm(8, 0), ShiftTime::hm(16, 0)),
            ShiftType::new("evening", ShiftTime::hm(14, 0), ShiftTime::hm(22, 0)),
            ShiftType::new("night", ShiftTime::hm(22, 0), ShiftTime::hm(6, 0)),
        ];
        let model = RosterProblemBuilder::new(&employees, &shifts, 28).build().unwrap();
        let settings = crate::config::SolverSettings::default();

        let a = FeasibilitySolver::with_kind(settings.feasibility_backend)
            .with_limits(settings.limits())
            .solve(&model)
            .unwrap();
        assert!(model.is_satisfied_by(&a));
        assert_eq!(a.true_count(), 7 * 20);
    }

    #[test]
    fn test_rejects_unverified_assignment() {
        let employees = vec![Employee::anonymous("E1"), Employee::anonymous("E2")];
        let shifts = vec![ShiftType::new("day", ShiftTime::hm(8, 0), ShiftTime::hm(16, 0))];
        let model = RosterProblemBuilder::new(&employees, &shifts, 28).build().unwrap();

        let bogus = Assignment::empty(model.var_count());
        let solver = FeasibilitySolver::new(Box::new(Scripted(SolveStatus::Optimal, Some(bogus))));
        assert!(solver.solve(&model).unwrap_err().is_infeasible());
    }

    #[test]
    fn test_timeout_is_not_success() {
        let employees = vec![Employee::anonymous("E1")];
        let shifts = vec![ShiftType::new("day", ShiftTime::hm(8, 0), ShiftTime::hm(16, 0))];
        let model = RosterProblemBuilder::new(&employees, &shifts, 28).build().unwrap();

        let solver = FeasibilitySolver::new(Box::new(Scripted(SolveStatus::Unknown, None)));
        let err = solver.solve(&model).unwrap_err();
        assert!(err.is_infeasible());
        assert!(err.to_string().contains("scripted"));
    }
}
