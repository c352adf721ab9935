//! Integer linear programming backend on `good_lp` (pure-Rust microlp engine).
//!
//! The time limit is passed to microlp. Running out of time with an
//! incumbent yields `Feasible`, without one `Unknown`.

use good_lp::{
    constraint, default_solver, variable, variables, Expression, ResolutionError, Solution,
    SolutionStatus, SolverModel, Variable, WithTimeLimit,
};
use tracing::debug;

use super::{as_bool, SolveLimits, SolveOutcome, SolverBackend};
use crate::problem::{Assignment, Comparison, Objective, RosterModel, Sense};

/// ILP backend. Without an objective the zero expression is maximised.
#[derive(Debug, Clone, Copy, Default)]
pub struct LpBackend;

impl LpBackend {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }
}

fn linear(terms: &[(usize, i32)], xs: &[Variable], constant: f64) -> Expression {
    terms
        .iter()
        .fold(Expression::from(constant), |acc, &(var, coef)| {
            acc + coef as f64 * xs[var]
        })
}

/// Classifies a returned solution. An incumbent cut short by a limit is
/// only feasible, unless there was nothing to optimise.
fn outcome_for(status: SolutionStatus, has_objective: bool, assignment: Assignment) -> SolveOutcome {
    match status {
        SolutionStatus::Optimal => SolveOutcome::optimal(assignment),
        _ if !has_objective => SolveOutcome::optimal(assignment),
        _ => SolveOutcome::feasible(assignment),
    }
}

impl SolverBackend for LpBackend {
    fn name(&self) -> &'static str {
        "lp"
    }

    fn solve(
        &self,
        model: &RosterModel,
        objective: Option<&Objective>,
        limits: &SolveLimits,
    ) -> SolveOutcome {
        let mut vars = variables!();
        let xs: Vec<Variable> = (0..model.var_count())
            .map(|i| vars.add(variable().binary().name(format!("x_{i}"))))
            .collect();

        let goal = match objective {
            Some(obj) => linear(&obj.terms, &xs, obj.constant as f64),
            None => Expression::from(0.0),
        };
        let unsolved = match objective.map(|o| o.sense) {
            Some(Sense::Minimise) => vars.minimise(goal),
            _ => vars.maximise(goal),
        };
        let mut problem = unsolved.using(default_solver);

        for c in model.constraints() {
            let lhs = linear(&c.terms, &xs, 0.0);
            let rhs = c.rhs as f64;
            problem.add_constraint(match c.comparison {
                Comparison::LessEq => constraint!(lhs <= rhs),
                Comparison::GreaterEq => constraint!(lhs >= rhs),
                Comparison::Equal => constraint!(lhs == rhs),
            });
        }

        if let Some(limit) = limits.time_limit {
            problem = problem.with_time_limit(limit.as_secs_f64());
        }

        match problem.solve() {
            Ok(solution) => {
                let assignment = Assignment::from_values(
                    xs.iter().map(|x| as_bool(solution.value(*x))).collect(),
                );
                let status = solution.status();
                debug!(backend = "lp", ?status, "branch-and-bound finished");
                outcome_for(status, objective.is_some(), assignment)
            }
            Err(ResolutionError::Infeasible) => {
                SolveOutcome::infeasible("linear relaxation or branch-and-bound proved infeasibility")
            }
            Err(other) => SolveOutcome::unknown(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RosterPolicy;
    use crate::models::{Employee, ShiftTime, ShiftType};
    use crate::problem::RosterProblemBuilder;
    use crate::scheduler::agreement_objective;
    use crate::solver::{SolveLimits, SolveStatus};
    use std::time::Duration;

    #[test]
    fn test_time_limited_incumbent_is_not_optimal() {
        let a = Assignment::empty(2);
        let o = outcome_for(SolutionStatus::TimeLimit, true, a.clone());
        assert_eq!(o.status, SolveStatus::Feasible);
        let o = outcome_for(SolutionStatus::GapLimit, true, a.clone());
        assert_eq!(o.status, SolveStatus::Feasible);
        // Without objective any satisfying assignment is as good as another
        let o = outcome_for(SolutionStatus::TimeLimit, false, a.clone());
        assert_eq!(o.status, SolveStatus::Optimal);
        let o = outcome_for(SolutionStatus::Optimal, true, a);
        assert_eq!(o.status, SolveStatus::Optimal);
    }

    #[test]
    fn test_solve_under_time_limit() {
        let employees: Vec<_> = (1..=7).map(|i| Employee::anonymous(format!("E{i}"))).collect();
        let shifts = vec![
            ShiftType::new("early", ShiftTime::hm(6, 0), ShiftTime::hm(14, 0)),
            ShiftType::new("day", ShiftTime::hm(8, 0), ShiftTime::hm(16, 0)),
            ShiftType::new("evening", ShiftTime::hm(14, 0), ShiftTime::hm(22, 0)),
            ShiftType::new("night", ShiftTime::hm(22, 0), ShiftTime::hm(6, 0)),
        ];
        let model = RosterProblemBuilder::new(&employees, &shifts, 28)
            .with_policy(RosterPolicy::default())
            .build()
            .unwrap();
        let backend = LpBackend::new();

        let generous = SolveLimits {
            time_limit: Some(Duration::from_secs(60)),
        };
        let baseline = backend.solve(&model, None, &generous);
        assert_eq!(baseline.status, SolveStatus::Optimal, "{}", baseline.reason());
        let baseline = baseline.assignment.unwrap();
        assert!(model.is_satisfied_by(&baseline));

        let objective = agreement_objective(&baseline);
        let outcome = backend.solve(&model, Some(&objective), &generous);
        assert_eq!(outcome.status, SolveStatus::Optimal, "{}", outcome.reason());
        assert_eq!(outcome.assignment.unwrap(), baseline);

        // A vanishing budget may stop early; whatever comes back is never an
        // unproven optimum and never an invalid assignment
        let tight = SolveLimits {
            time_limit: Some(Duration::from_nanos(1)),
        };
        let outcome = backend.solve(&model, Some(&objective), &tight);
        match outcome.status {
            SolveStatus::Optimal => {
                let a = outcome.assignment.unwrap();
                assert!(model.is_satisfied_by(&a));
                assert_eq!(objective.evaluate(&a), objective.bounds().1);
            }
            SolveStatus::Feasible => assert!(outcome.assignment.is_some()),
            SolveStatus::Unknown | SolveStatus::Infeasible => {
                assert!(outcome.assignment.is_none())
            }
        }
    }
}
