//! Shift roster generation for the U-Engine ecosystem.
//!
//! Builds monthly shift rosters under labor rules with a two-phase solve:
//! a feasibility pass produces a baseline roster, and a stability pass
//! re-solves the same model for maximum agreement with that baseline.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Employee`, `ShiftType`, `ShiftTime`,
//!   `Roster`, `MonthBlock`, `Violation`
//! - **`problem`**: Model builder: decision variables and linear constraint
//!   families (quota, consecutive work, coverage, restricted shifts, weekly rest)
//! - **`solver`**: Pluggable backends, CP (`pumpkin-solver`) and ILP (`good_lp`)
//! - **`scheduler`**: Feasibility and stability phases, horizon composition, KPIs
//! - **`validation`**: Input checks and roster audits
//! - **`config`**: Policy and solver settings, loadable from TOML
//!
//! # Example
//!
//! ```no_run
//! use u_roster::generate_roster;
//! use u_roster::models::{Employee, ShiftTime, ShiftType};
//!
//! let employees: Vec<_> = (1..=7).map(|i| Employee::anonymous(format!("E{i}"))).collect();
//! let shifts = vec![
//!     ShiftType::new("early", ShiftTime::hm(6, 0), ShiftTime::hm(14, 0)),
//!     ShiftType::new("late", ShiftTime::hm(14, 0), ShiftTime::hm(22, 0)),
//!     ShiftType::new("night", ShiftTime::hm(22, 0), ShiftTime::hm(6, 0)),
//! ];
//! let roster = generate_roster(&employees, &shifts, 2).unwrap();
//! assert_eq!(roster.employee_count(), 7);
//! ```
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"

pub mod config;
pub mod error;
pub mod models;
pub mod problem;
pub mod scheduler;
pub mod solver;
pub mod validation;

pub use error::{Result, RosterError};
pub use scheduler::generate_roster;
