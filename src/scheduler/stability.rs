//! Stability phase: re-solve the same model, maximising agreement with a
//! feasible baseline.
//!
//! # Objective
//! ```text
//! agreement(x) = Σ_{b_i = 1} x_i + Σ_{b_i = 0} (1 - x_i)
//!              = |{i : b_i = 0}| + Σ_{b_i = 1} x_i - Σ_{b_i = 0} x_i
//! ```
//! counts the variables whose truth value matches the baseline `b`. It is a
//! stability measure against a reference roster, not a workload-equity
//! measure.

use tracing::{debug, warn};

use crate::error::{Result, RosterError};
use crate::problem::{Assignment, Objective, RosterModel, Sense};
use crate::solver::{BackendKind, SolveLimits, SolveStatus, SolverBackend};

/// Result of the stability phase.
#[derive(Debug, Clone)]
pub struct StabilityOutcome {
    /// Optimised assignment.
    pub assignment: Assignment,
    /// Number of variables agreeing with the baseline.
    pub agreement: usize,
}

/// Builds the agreement objective for a baseline.
pub fn agreement_objective(baseline: &Assignment) -> Objective {
    let terms = baseline
        .values()
        .iter()
        .enumerate()
        .map(|(var, &on)| (var, if on { 1 } else { -1 }))
        .collect();
    Objective {
        sense: Sense::Maximise,
        terms,
        constant: (baseline.len() - baseline.true_count()) as i32,
    }
}

/// Re-solves a model with the agreement objective.
#[derive(Debug)]
pub struct StabilityOptimizer {
    backend: Box<dyn SolverBackend>,
    limits: SolveLimits,
}

impl StabilityOptimizer {
    /// Creates an optimizer on the given backend.
    pub fn new(backend: Box<dyn SolverBackend>) -> Self {
        Self {
            backend,
            limits: SolveLimits::default(),
        }
    }

    /// Creates an optimizer from a backend selector.
    pub fn with_kind(kind: BackendKind) -> Self {
        Self::new(kind.backend())
    }

    /// Sets solver limits.
    pub fn with_limits(mut self, limits: SolveLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Optimises `model` towards `baseline`.
    ///
    /// `model` must be the very model the baseline was solved on.
    ///
    /// # Errors
    /// `NoOptimal` if the backend does not prove an optimum (including time
    /// limits), or returns values violating the model. Both indicate a
    /// defect since the baseline itself is a feasible point.
    pub fn optimize(&self, model: &RosterModel, baseline: &Assignment) -> Result<StabilityOutcome> {
        if baseline.len() != model.var_count() {
            return Err(RosterError::NoOptimal(format!(
                "baseline has {} values, model has {} variables",
                baseline.len(),
                model.var_count()
            )));
        }

        let objective = agreement_objective(baseline);
        let outcome = self.backend.solve(model, Some(&objective), &self.limits);
        debug!(
            backend = self.backend.name(),
            status = ?outcome.status,
            "stability phase finished"
        );

        let assignment = match (outcome.status, outcome.assignment) {
            (SolveStatus::Optimal, Some(assignment)) => assignment,
            (status, _) => {
                return Err(RosterError::NoOptimal(format!(
                    "{} backend: {}",
                    self.backend.name(),
                    outcome
                        .detail
                        .unwrap_or_else(|| format!("{status:?} without proven optimum"))
                )))
            }
        };

        let violated = model.violations(&assignment).len();
        if violated > 0 {
            warn!(backend = self.backend.name(), violated, "optimum violates the model");
            return Err(RosterError::NoOptimal(format!(
                "{} backend returned an assignment violating {violated} constraints",
                self.backend.name()
            )));
        }

        let agreement = assignment.agreement(baseline);
        debug_assert_eq!(objective.evaluate(&assignment), agreement as i64);
        Ok(StabilityOutcome {
            assignment,
            agreement,
        })
    }
}
