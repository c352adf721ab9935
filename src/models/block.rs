//! Month-block model.
//!
//! A multi-month horizon is solved as a sequence of fixed-length blocks.
//! Block-local day offsets start at 0; the block's position in the horizon
//! is an explicit value rather than a running counter.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::{Result, RosterError};

/// One fixed-length scheduling window of a horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthBlock {
    /// Zero-based position in the horizon.
    pub index: usize,
    /// Number of days in the block.
    pub length: usize,
}

impl MonthBlock {
    /// Creates a block.
    pub fn new(index: usize, length: usize) -> Self {
        Self { index, length }
    }

    /// Splits a horizon of `months` blocks of `length` days.
    ///
    /// # Errors
    /// `InvalidInput` if the horizon's last day offset does not fit in `u32`.
    pub fn split(months: usize, length: usize) -> Result<Vec<Self>> {
        months
            .checked_mul(length)
            .and_then(|days| u32::try_from(days).ok())
            .ok_or_else(|| {
                RosterError::InvalidInput(format!(
                    "{months} blocks of {length} days exceed the day offset range"
                ))
            })?;
        Ok((0..months).map(|index| Self::new(index, length)).collect())
    }

    /// Horizon day offset of this block's day 0, `None` if out of range.
    #[inline]
    pub fn offset(&self) -> Option<u32> {
        self.index
            .checked_mul(self.length)
            .and_then(|offset| u32::try_from(offset).ok())
    }

    /// Horizon day offsets covered by this block, `None` if out of range.
    pub fn day_range(&self) -> Option<Range<u32>> {
        let start = self.offset()?;
        let end = start.checked_add(u32::try_from(self.length).ok()?)?;
        Some(start..end)
    }
}
