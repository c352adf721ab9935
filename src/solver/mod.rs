//! Pluggable solver boundary.
//!
//! Both solving phases talk to a [`SolverBackend`]: "take these boolean
//! variables and linear constraints, optionally optimise this objective,
//! give me back values". The model-construction code never sees a solver
//! library.
//!
//! | Backend | Library | Technique |
//! |---------|---------|-----------|
//! | [`CpBackend`] | `pumpkin-solver` | Lazy clause generation CP |
//! | [`LpBackend`] | `good_lp` (microlp) | Integer linear programming |
//!
//! # Reference
//! - Stuckey (2010), "Lazy Clause Generation: Combining the power of SAT and CP"
//! - Wolsey (1998), "Integer Programming"

mod cp;
mod lp;

pub use cp::CpBackend;
pub use lp::LpBackend;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;

use crate::problem::{Assignment, Objective, RosterModel};

/// Outcome classification of a solver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Solution found and proven optimal (or any solution, without objective).
    Optimal,
    /// Solution found, optimality not proven (limit reached).
    Feasible,
    /// Proven that no solution exists.
    Infeasible,
    /// Gave up (limit reached or backend error) without a solution.
    Unknown,
}

/// Result of one solver call.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Status.
    pub status: SolveStatus,
    /// Variable values, present for `Optimal` and `Feasible`.
    pub assignment: Option<Assignment>,
    /// Backend-specific detail for failures.
    pub detail: Option<String>,
}

impl SolveOutcome {
    /// Proven optimal (or satisfying) solution.
    pub fn optimal(assignment: Assignment) -> Self {
        Self {
            status: SolveStatus::Optimal,
            assignment: Some(assignment),
            detail: None,
        }
    }

    /// Solution without optimality proof.
    pub fn feasible(assignment: Assignment) -> Self {
        Self {
            status: SolveStatus::Feasible,
            assignment: Some(assignment),
            detail: None,
        }
    }

    /// Proven infeasible.
    pub fn infeasible(detail: impl Into<String>) -> Self {
        Self {
            status: SolveStatus::Infeasible,
            assignment: None,
            detail: Some(detail.into()),
        }
    }

    /// No answer.
    pub fn unknown(detail: impl Into<String>) -> Self {
        Self {
            status: SolveStatus::Unknown,
            assignment: None,
            detail: Some(detail.into()),
        }
    }

    /// Human-readable reason for a failed call.
    pub fn reason(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{:?}: {detail}", self.status),
            None => format!("{:?}", self.status),
        }
    }
}

/// Resource limits for a solver call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveLimits {
    /// Wall-clock limit. `None` = unlimited.
    pub time_limit: Option<Duration>,
}

/// A constraint/integer-programming solver.
///
/// Implementations must never report `Optimal`/`Feasible` with a partial
/// assignment: either every variable has a value, or there is no assignment.
pub trait SolverBackend: Send + Sync + Debug {
    /// Backend name (for logs).
    fn name(&self) -> &'static str;

    /// Solves `model`. Without an objective, any satisfying assignment is
    /// reported as `Optimal`.
    fn solve(
        &self,
        model: &RosterModel,
        objective: Option<&Objective>,
        limits: &SolveLimits,
    ) -> SolveOutcome;
}

/// Backend selector used in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Constraint programming (`pumpkin-solver`).
    Cp,
    /// Integer linear programming (`good_lp`).
    Lp,
}

impl BackendKind {
    /// Instantiates the backend.
    pub fn backend(self) -> Box<dyn SolverBackend> {
        match self {
            Self::Cp => Box::new(CpBackend::new()),
            Self::Lp => Box::new(LpBackend::new()),
        }
    }
}

/// Reads a solver value as a boolean (rounding relaxed values).
#[inline]
pub(crate) fn as_bool(value: f64) -> bool {
    value > 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Comparison, ConstraintFamily, LinearConstraint, Sense};

    /// 1 employee, 4 days, 2 shifts: work exactly 2 days, at most one shift
    /// per day, day 0 must be covered by shift 1.
    fn tiny_model() -> RosterModel {
        let mut m = RosterModel::new(1, 4, 2);
        let all: Vec<_> = (0..m.var_count()).collect();
        m.add_constraint(LinearConstraint::sum(
            ConstraintFamily::TotalLoad,
            all,
            Comparison::Equal,
            2,
        ));
        for d in 0..4 {
            let vars: Vec<_> = m.day_vars(0, d).collect();
            m.add_constraint(LinearConstraint::sum(
                ConstraintFamily::OneShiftPerDay,
                vars,
                Comparison::LessEq,
                1,
            ));
        }
        let v = m.var(0, 0, 1);
        m.add_constraint(LinearConstraint::sum(
            ConstraintFamily::Coverage,
            [v],
            Comparison::GreaterEq,
            1,
        ));
        m
    }

    fn contradictory_model() -> RosterModel {
        let mut m = tiny_model();
        let all: Vec<_> = (0..m.var_count()).collect();
        m.add_constraint(LinearConstraint::sum(
            ConstraintFamily::TotalLoad,
            all,
            Comparison::LessEq,
            1,
        ));
        m
    }

    fn limits() -> SolveLimits {
        SolveLimits {
            time_limit: Some(Duration::from_secs(10)),
        }
    }

    fn check_backend(kind: BackendKind) {
        let backend = kind.backend();
        let model = tiny_model();

        let outcome = backend.solve(&model, None, &limits());
        assert_eq!(outcome.status, SolveStatus::Optimal, "{}", outcome.reason());
        let a = outcome.assignment.unwrap();
        assert!(model.is_satisfied_by(&a));

        // Prefer shift 0 on days 2 and 3: optimum puts the second day there
        let objective = Objective {
            sense: Sense::Maximise,
            terms: vec![(model.var(0, 2, 0), 1), (model.var(0, 3, 0), 2)],
            constant: 0,
        };
        let outcome = backend.solve(&model, Some(&objective), &limits());
        assert_eq!(outcome.status, SolveStatus::Optimal, "{}", outcome.reason());
        let a = outcome.assignment.unwrap();
        assert!(model.is_satisfied_by(&a));
        assert_eq!(objective.evaluate(&a), 2);
        assert!(a.value(model.var(0, 3, 0)));

        let outcome = backend.solve(&contradictory_model(), None, &limits());
        assert_eq!(outcome.status, SolveStatus::Infeasible, "{}", outcome.reason());
        assert!(outcome.assignment.is_none());
    }

    #[test]
    fn test_cp_backend() {
        check_backend(BackendKind::Cp);
        assert_eq!(BackendKind::Cp.backend().name(), "cp");
    }

    #[test]
    fn test_lp_backend() {
        check_backend(BackendKind::Lp);
        assert_eq!(BackendKind::Lp.backend().name(), "lp");
    }

    #[test]
    fn test_backend_kind_serde() {
        let kind: BackendKind = serde_json::from_str("\"lp\"").unwrap();
        assert_eq!(kind, BackendKind::Lp);
        assert_eq!(serde_json::to_string(&BackendKind::Cp).unwrap(), "\"cp\"");
    }

    #[test]
    fn test_outcome_reason() {
        let o = SolveOutcome::unknown("time limit");
        assert_eq!(o.reason(), "Unknown: time limit");
        assert!(SolveOutcome::infeasible("x").assignment.is_none());
    }
}
