//! Leap-aware day-of-year newtype.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::error::CalendarError;

/// Day-of-year in the Gregorian calendar (1..=366).
///
/// Day 366 only occurs in leap years, but climatologies built on a leap
/// calendar carry an entry for it, so it is always a valid value here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Doy(pub(crate) u16);

impl Doy {
    /// Largest valid day-of-year.
    pub const MAX: u16 = 366;

    /// Creates a new `Doy` from a day-of-year value.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDoy`] if `doy` is not in 1..=366.
    pub fn new(doy: u16) -> Result<Self, CalendarError> {
        if !(1..=Self::MAX).contains(&doy) {
            return Err(CalendarError::InvalidDoy { doy });
        }
        Ok(Self(doy))
    }

    /// Day-of-year of a calendar date (January 1 is day 1).
    pub fn of(date: NaiveDate) -> Self {
        // NaiveDate::ordinal is always 1..=366.
        Self(date.ordinal() as u16)
    }

    /// Returns the inner day-of-year value (1..=366).
    pub fn get(self) -> u16 {
        self.0
    }

    /// Returns the 0-based index suitable for array indexing (0..=365).
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for Doy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
