//! Two-phase roster scheduling and KPI evaluation.
//!
//! # Algorithm
//!
//! Each month block goes through the same pipeline:
//!
//! 1. [`FeasibilitySolver`]: any assignment satisfying the hard constraints
//!    (the baseline).
//! 2. [`StabilityOptimizer`]: the same model re-solved, maximising the
//!    number of variables that agree with the baseline.
//! 3. [`extract_roster`]: variables → block-local [`Roster`](crate::models::Roster).
//!
//! [`RosterScheduler`] repeats this per block and merges the results with
//! [`merge_blocks`].
//!
//! # KPI
//!
//! [`RosterKpi`] reports working days and hours per employee and slot
//! staffing levels.

mod extract;
mod feasibility;
mod horizon;
mod kpi;
mod stability;

pub use extract::extract_roster;
pub use feasibility::FeasibilitySolver;
pub use horizon::{
    generate_roster, merge_blocks, BlockResult, BlockSummary, RosterPlan, RosterRequest,
    RosterScheduler,
};
pub use kpi::RosterKpi;
pub use stability::{agreement_objective, StabilityOptimizer, StabilityOutcome};
