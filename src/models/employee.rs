//! Employee model.
//!
//! Employees are supplied by the caller for the duration of one scheduling
//! run. The engine never creates or destroys them; it only reads their
//! identifiers and (for reports) their display names.

use serde::{Deserialize, Serialize};

/// A person that can be assigned to shifts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
}

impl Employee {
    /// Creates a new employee.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Creates an employee whose display name is its id.
    pub fn anonymous(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
