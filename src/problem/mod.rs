//! Solver-neutral roster model.
//!
//! [`RosterProblemBuilder`] turns employees, shift types and a policy into a
//! [`RosterModel`]: boolean decision variables and linear constraints over
//! them. Backends in [`crate::solver`] consume the model as-is.

mod builder;
mod model;

pub use builder::{BoundaryHistory, RosterProblemBuilder};
pub use model::{
    Assignment, Comparison, ConstraintFamily, LinearConstraint, Objective, RosterModel, Sense,
    VarId,
};
