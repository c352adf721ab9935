//! Constraint-programming backend on `pumpkin-solver`.
//!
//! Every decision variable becomes an integer variable with domain `{0, 1}`
//! and every linear constraint a `≥` linear inequality (`≤` and `=` are
//! posted through negated terms). The objective is channelled into one
//! integer variable and optimised with linear SAT-UNSAT search. Without an
//! objective the model is handed to plain satisfaction search.
//!
//! Suited to small blocks and to proving infeasibility quickly; full-size
//! blocks are better served by [`LpBackend`](super::LpBackend).

use std::time::Duration;

use pumpkin_solver::constraints as cp;
use pumpkin_solver::optimisation::linear_sat_unsat::LinearSatUnsat;
use pumpkin_solver::optimisation::OptimisationDirection;
use pumpkin_solver::results::{
    OptimisationResult, ProblemSolution, SatisfactionResult, SolutionReference,
};
use pumpkin_solver::termination::TimeBudget;
use pumpkin_solver::variables::{DomainId, TransformableVariable};
use pumpkin_solver::Solver;
use tracing::debug;

use super::{SolveLimits, SolveOutcome, SolverBackend};
use crate::problem::{Assignment, Comparison, Objective, RosterModel, Sense};

// Budget used when the caller sets no time limit.
const UNLIMITED: Duration = Duration::from_secs(365 * 24 * 3600);

/// Lazy clause generation CP backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpBackend;

impl CpBackend {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }
}

fn negated(terms: &[(DomainId, i32)]) -> Vec<(DomainId, i32)> {
    terms.iter().map(|&(v, c)| (v, -c)).collect()
}

fn read<S: ProblemSolution>(vars: &[DomainId], solution: &S) -> Assignment {
    Assignment::from_values(
        vars.iter()
            .map(|&v| solution.get_integer_value(v) == 1)
            .collect(),
    )
}

fn noop_callback<B>(_: &Solver, _: SolutionReference, _: &B) {}

impl SolverBackend for CpBackend {
    fn name(&self) -> &'static str {
        "cp"
    }

    fn solve(
        &self,
        model: &RosterModel,
        objective: Option<&Objective>,
        limits: &SolveLimits,
    ) -> SolveOutcome {
        let mut solver = Solver::default();

        let vars: Vec<DomainId> = (0..model.var_count())
            .map(|_| solver.new_bounded_integer(0, 1))
            .collect();

        let (lo, hi) = objective.map_or((0, 0), Objective::bounds);
        let (Ok(lo), Ok(hi)) = (i32::try_from(lo), i32::try_from(hi)) else {
            return SolveOutcome::unknown("objective range exceeds 32-bit integers");
        };
        let objective_var = solver.new_bounded_integer(lo, hi);
        let direction = match objective.map(|o| o.sense) {
            Some(Sense::Maximise) => OptimisationDirection::Maximise,
            _ => OptimisationDirection::Minimise,
        };

        let tag = solver.new_constraint_tag();
        let mut post_geq = |terms: Vec<(DomainId, i32)>, rhs: i32| -> bool {
            let scaled: Vec<_> = terms.into_iter().map(|(v, c)| v.scaled(c)).collect();
            solver
                .add_constraint(cp::greater_than_or_equals(scaled, rhs, tag))
                .post()
                .is_ok()
        };

        let mut consistent = true;
        for constraint in model.constraints() {
            let terms: Vec<(DomainId, i32)> = constraint
                .terms
                .iter()
                .map(|&(var, coef)| (vars[var], coef))
                .collect();
            consistent = match constraint.comparison {
                Comparison::GreaterEq => post_geq(terms, constraint.rhs),
                Comparison::LessEq => post_geq(negated(&terms), -constraint.rhs),
                Comparison::Equal => {
                    post_geq(negated(&terms), -constraint.rhs) && post_geq(terms, constraint.rhs)
                }
            };
            if !consistent {
                break;
            }
        }

        // objective_var = constant + Σ coef·x
        if let (true, Some(obj)) = (consistent, objective) {
            let mut terms = vec![(objective_var, 1)];
            terms.extend(obj.terms.iter().map(|&(var, coef)| (vars[var], -coef)));
            consistent =
                post_geq(negated(&terms), -obj.constant) && post_geq(terms, obj.constant);
        }

        if !consistent {
            debug!(backend = "cp", "conflict while posting constraints");
            return SolveOutcome::infeasible("constraints conflict at the root");
        }

        let mut brancher = solver.default_brancher();
        let mut termination =
            TimeBudget::starting_now(limits.time_limit.unwrap_or(UNLIMITED));

        if objective.is_none() {
            return match solver.satisfy(&mut brancher, &mut termination) {
                SatisfactionResult::Satisfiable(satisfiable) => {
                    SolveOutcome::optimal(read(&vars, &satisfiable.solution()))
                }
                SatisfactionResult::Unsatisfiable(..) => {
                    SolveOutcome::infeasible("search proved the model unsatisfiable")
                }
                SatisfactionResult::Unknown(..) => {
                    SolveOutcome::unknown("time limit reached before a solution was found")
                }
            };
        }

        let result = solver.optimise(
            &mut brancher,
            &mut termination,
            LinearSatUnsat::new(direction, objective_var, noop_callback),
        );

        match result {
            OptimisationResult::Optimal(solution) => {
                SolveOutcome::optimal(read(&vars, &solution))
            }
            OptimisationResult::Satisfiable(solution) => {
                SolveOutcome::feasible(read(&vars, &solution))
            }
            OptimisationResult::Unsatisfiable => {
                SolveOutcome::infeasible("search proved the model unsatisfiable")
            }
            OptimisationResult::Unknown => {
                SolveOutcome::unknown("time limit reached before a solution was found")
            }
        }
    }
}
