//! Rostering domain models.
//!
//! Provides the data types that enter and leave a scheduling run. All of
//! them are read-only inputs except [`Roster`], the only value the engine
//! creates.
//!
//! | Type | Meaning |
//! |------|---------|
//! | Employee | Person that can be assigned to shifts |
//! | ShiftType | Recurring work interval (start/end time of day) |
//! | Roster | Employee → day offset → shift type |
//! | MonthBlock | Fixed-length window solved independently |

mod block;
mod employee;
mod roster;
mod shift;

pub use block::MonthBlock;
pub use employee::Employee;
pub use roster::{DayShifts, Roster, Violation, ViolationType};
pub use shift::{ShiftTime, ShiftType};
