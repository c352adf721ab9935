//! Shift-type and time-of-day models.
//!
//! A shift type is a named recurring work interval, reused on every day of
//! the horizon. Its start and end are wall-clock times; an end at or before
//! the start means the shift runs past midnight into the next day.
//!
//! # Time Model
//! Times are minutes after midnight (0..1440). Calendar dates never enter
//! the engine; only day offsets do.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time of day with minute resolution.
///
/// Serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShiftTime {
    hour: u8,
    minute: u8,
}

impl ShiftTime {
    /// Creates a time of day. Returns `None` for out-of-range values.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Creates a time from literal parts.
    ///
    /// # Panics
    /// Panics if `hour >= 24` or `minute >= 60`.
    pub const fn hm(hour: u8, minute: u8) -> Self {
        assert!(hour < 24 && minute < 60, "invalid time of day");
        Self { hour, minute }
    }

    /// Hour component (0..24).
    #[inline]
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute component (0..60).
    #[inline]
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes after midnight.
    #[inline]
    pub fn minutes_of_day(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }
}

impl fmt::Display for ShiftTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ShiftTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("expected HH:MM, got '{s}'"))?;
        let hour: u8 = h.parse().map_err(|_| format!("invalid hour in '{s}'"))?;
        let minute: u8 = m.parse().map_err(|_| format!("invalid minute in '{s}'"))?;
        Self::new(hour, minute).ok_or_else(|| format!("time out of range: '{s}'"))
    }
}

impl TryFrom<String> for ShiftTime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShiftTime> for String {
    fn from(value: ShiftTime) -> Self {
        value.to_string()
    }
}

/// A recurring shift (e.g. "Night 22:00-06:00").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftType {
    /// Unique shift-type identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Start time.
    pub start: ShiftTime,
    /// End time. At or before `start` means the shift ends the next day.
    pub end: ShiftTime,
}

impl ShiftType {
    /// Creates a new shift type.
    pub fn new(id: impl Into<String>, start: ShiftTime, end: ShiftTime) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            start,
            end,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether the shift crosses midnight.
    pub fn wraps_midnight(&self) -> bool {
        self.end <= self.start
    }

    /// Shift length in minutes. `end == start` is a 24-hour shift.
    pub fn duration_minutes(&self) -> u32 {
        let start = self.start.minutes_of_day();
        let end = self.end.minutes_of_day();
        if end > start {
            end - start
        } else {
            MINUTES_PER_DAY - start + end
        }
    }

    /// Shift length in hours.
    pub fn duration_hours(&self) -> f64 {
        self.duration_minutes() as f64 / 60.0
    }

    /// Whether the shift starts at the given time.
    pub fn starts_at(&self, time: ShiftTime) -> bool {
        self.start == time
    }
}
