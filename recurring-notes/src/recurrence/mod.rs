//! Decides which notes are active on a given calendar date.

mod date;
mod kind;
mod matcher;

pub use date::{parse_date, StoredDate, DATE_FORMAT};
pub use kind::Recurrence;
pub use matcher::{active_dates_between, active_notes_on, is_active_on, AnchorPolicy, Schedule};
