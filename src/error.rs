//! Error types for roster generation.

use thiserror::Error;

/// Result type for roster operations.
pub type Result<T> = std::result::Result<T, RosterError>;

/// Errors that terminate a scheduling run.
///
/// None of them carry a partial roster: a run either yields a complete
/// roster or one of these.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Empty employee/shift-type set, duplicate ids, or a horizon too short
    /// for the labor-rule windows.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The hard constraints cannot be satisfied (usually too few employees
    /// for coverage × quota), or the solver gave up before finding a roster.
    #[error("No feasible roster: {0}")]
    Infeasible(String),

    /// The stability phase failed although a feasible baseline exists.
    /// Indicates a model-consistency defect, not a genuine infeasibility.
    #[error("No optimal roster: {0}")]
    NoOptimal(String),

    /// Configuration rejected by validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl RosterError {
    /// Prefixes solver failures with the (1-based) month block they occurred in.
    pub fn in_block(self, block_index: usize) -> Self {
        let month = block_index + 1;
        match self {
            Self::Infeasible(reason) => Self::Infeasible(format!("month block {month}: {reason}")),
            Self::NoOptimal(reason) => Self::NoOptimal(format!("month block {month}: {reason}")),
            other => other,
        }
    }

    /// Whether this is an `Infeasible` failure.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Self::Infeasible(_))
    }
}
