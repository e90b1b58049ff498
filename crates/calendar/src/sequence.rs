//! Daily date sequence generation.

use chrono::{Days, NaiveDate};

use crate::error::CalendarError;

/// Generates `n_days` consecutive dates starting at `start`.
///
/// Generation stops early only if the calendar's upper bound is reached.
pub fn daily_sequence(start: NaiveDate, n_days: usize) -> Vec<NaiveDate> {
    start.iter_days().take(n_days).collect()
}

/// The `n_days` consecutive dates ending on (and including) `end`.
///
/// # Errors
///
/// Returns [`CalendarError::DateOverflow`] if the first date cannot be
/// represented.
pub fn trailing_dates(end: NaiveDate, n_days: u32) -> Result<Vec<NaiveDate>, CalendarError> {
    if n_days == 0 {
        return Ok(Vec::new());
    }
    let start = end
        .checked_sub_days(Days::new(u64::from(n_days - 1)))
        .ok_or(CalendarError::DateOverflow {
            date: end,
            days: n_days - 1,
        })?;
    Ok(daily_sequence(start, n_days as usize))
}
