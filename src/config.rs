//! Scheduler configuration.
//!
//! Groups the labor-rule policy and the solver settings. Every field has a
//! default matching the reference 28-day / 20-shift policy, so a TOML file
//! only needs to name what it changes:
//!
//! ```toml
//! [policy]
//! quota_days = 18
//! carry_over_boundary = true
//!
//! [solver]
//! feasibility_backend = "cp"
//! stability_backend = "lp"
//! time_limit_ms = 30000
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, RosterError};
use crate::models::ShiftTime;
use crate::solver::{BackendKind, SolveLimits};

/// Complete scheduler configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Labor rules applied to every month block.
    pub policy: RosterPolicy,
    /// Backend selection and limits.
    pub solver: SolverSettings,
}

/// Labor-rule policy for one month block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterPolicy {
    /// Days per month block.
    pub block_length_days: usize,
    /// Exact number of working days per employee and block.
    pub quota_days: usize,
    /// Maximum working days in any window of `max_consecutive_days + 1` days.
    pub max_consecutive_days: usize,
    /// Length of the non-overlapping rest windows.
    pub week_length_days: usize,
    /// Maximum working days per rest window.
    pub max_days_per_week: usize,
    /// Minimum employees per (day, shift) slot.
    pub min_staff_per_shift: usize,
    /// Maximum employees per (day, shift) slot. `None` = unbounded.
    pub max_staff_per_shift: Option<usize>,
    /// Shift types that may only be followed by themselves or a day off.
    pub restricted_shifts: Vec<RestrictedShift>,
    /// Extend consecutive-work and continuation rules across block boundaries.
    pub carry_over_boundary: bool,
}

/// A shift type, identified by its start time, that restricts the next day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictedShift {
    /// Label used in logs and audit messages (e.g. "night").
    pub label: String,
    /// Start time that identifies the shift type.
    pub start: ShiftTime,
}

/// Solver backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Backend for the feasibility phase.
    pub feasibility_backend: BackendKind,
    /// Backend for the stability phase.
    pub stability_backend: BackendKind,
    /// Wall-clock limit per solver call. `None` = unlimited.
    pub time_limit_ms: Option<u64>,
}

impl Default for RosterPolicy {
    fn default() -> Self {
        Self {
            block_length_days: 28,
            quota_days: 20,
            max_consecutive_days: 3,
            week_length_days: 7,
            max_days_per_week: 5,
            min_staff_per_shift: 1,
            max_staff_per_shift: None,
            restricted_shifts: vec![
                RestrictedShift::new("night", ShiftTime::hm(22, 0)),
                RestrictedShift::new("evening", ShiftTime::hm(14, 0)),
            ],
            carry_over_boundary: false,
        }
    }
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            feasibility_backend: BackendKind::Lp,
            stability_backend: BackendKind::Lp,
            time_limit_ms: Some(60_000),
        }
    }
}

impl RestrictedShift {
    /// Creates a restricted-shift marker.
    pub fn new(label: impl Into<String>, start: ShiftTime) -> Self {
        Self {
            label: label.into(),
            start,
        }
    }
}

impl RosterPolicy {
    /// Length of the sliding consecutive-work window.
    #[inline]
    pub fn consecutive_window(&self) -> usize {
        self.max_consecutive_days + 1
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(RosterError::Config(msg));

        if self.block_length_days == 0 {
            return fail("block_length_days must be positive".into());
        }
        if self.quota_days > self.block_length_days {
            return fail(format!(
                "quota_days ({}) exceeds block_length_days ({})",
                self.quota_days, self.block_length_days
            ));
        }
        if self.max_consecutive_days == 0 {
            return fail("max_consecutive_days must be positive".into());
        }
        if self.week_length_days == 0 {
            return fail("week_length_days must be positive".into());
        }
        if self.max_days_per_week > self.week_length_days {
            return fail(format!(
                "max_days_per_week ({}) exceeds week_length_days ({})",
                self.max_days_per_week, self.week_length_days
            ));
        }
        if let Some(max) = self.max_staff_per_shift {
            if max < self.min_staff_per_shift {
                return fail(format!(
                    "max_staff_per_shift ({max}) below min_staff_per_shift ({})",
                    self.min_staff_per_shift
                ));
            }
        }
        Ok(())
    }
}

impl SolverSettings {
    /// Limits passed to every solver call.
    pub fn limits(&self) -> SolveLimits {
        SolveLimits {
            time_limit: self.time_limit_ms.map(Duration::from_millis),
        }
    }
}

impl SchedulerConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SchedulerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Sets the policy.
    pub fn with_policy(mut self, policy: RosterPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the solver settings.
    pub fn with_solver(mut self, solver: SolverSettings) -> Self {
        self.solver = solver;
        self
    }

    /// Validates the whole configuration.
    pub fn validate(&self) -> Result<()> {
        self.policy.validate()
    }
}
