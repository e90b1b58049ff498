//! Inclusive day-of-year windows with year wraparound.

use std::ops::RangeInclusive;

use chrono::{Days, NaiveDate};

use crate::doy::Doy;
use crate::error::CalendarError;

/// An inclusive day-of-year window `[start, end]`.
///
/// A window whose start day comes after its end day crosses the year
/// boundary and covers `[1, end]` together with `[start, 366]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoyWindow {
    /// `start <= end`, a single run of days within one year.
    Contiguous {
        /// First day of the window.
        start: Doy,
        /// Last day of the window.
        end: Doy,
    },
    /// The window spans late prior year and early current year.
    Wrapped {
        /// First day of the window (in the prior year).
        start: Doy,
        /// Last day of the window (in the current year).
        end: Doy,
    },
}

impl DoyWindow {
    /// Builds a window from explicit bounds: contiguous when
    /// `start <= end`, wrapped otherwise.
    pub fn from_bounds(start: Doy, end: Doy) -> Self {
        if start <= end {
            Self::Contiguous { start, end }
        } else {
            Self::Wrapped { start, end }
        }
    }

    /// Window covering the `days` calendar days ending on `end_date`.
    ///
    /// A multi-day window whose start falls on the same day-of-year as its
    /// end (a full year spanning February 29) is wrapped, not a single day.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidWindowLength`] if `days` is not in
    /// 1..=366, or [`CalendarError::DateOverflow`] if the start date cannot
    /// be represented.
    pub fn trailing(end_date: NaiveDate, days: u32) -> Result<Self, CalendarError> {
        if !(1..=u32::from(Doy::MAX)).contains(&days) {
            return Err(CalendarError::InvalidWindowLength { days });
        }
        let start_date = end_date
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .ok_or(CalendarError::DateOverflow {
                date: end_date,
                days: days - 1,
            })?;
        let start = Doy::of(start_date);
        let end = Doy::of(end_date);
        if days > 1 && start == end {
            return Ok(Self::Wrapped { start, end });
        }
        Ok(Self::from_bounds(start, end))
    }

    /// First day of the window.
    pub fn start(&self) -> Doy {
        match *self {
            Self::Contiguous { start, .. } | Self::Wrapped { start, .. } => start,
        }
    }

    /// Last day of the window.
    pub fn end(&self) -> Doy {
        match *self {
            Self::Contiguous { end, .. } | Self::Wrapped { end, .. } => end,
        }
    }

    /// Whether the window crosses the year boundary.
    pub fn is_wrapped(&self) -> bool {
        matches!(self, Self::Wrapped { .. })
    }

    /// Day-of-year ranges covered by the window, given the last day a
    /// reference actually holds (365 or 366).
    ///
    /// The upper range of a wrapped window stops at `last_doy`; a
    /// contiguous window is returned as-is and the caller checks it fits.
    pub fn ranges(&self, last_doy: u16) -> Vec<RangeInclusive<u16>> {
        match *self {
            Self::Contiguous { start, end } => vec![start.get()..=end.get()],
            Self::Wrapped { start, end } => {
                let mut ranges = vec![1..=end.get()];
                if start.get() <= last_doy {
                    ranges.push(start.get()..=last_doy);
                }
                ranges
            }
        }
    }

    /// Every day-of-year in the window in ascending order.
    pub fn doys(&self, last_doy: u16) -> Vec<Doy> {
        self.ranges(last_doy)
            .into_iter()
            .flatten()
            .map(Doy)
            .collect()
    }
}

impl std::fmt::Display for DoyWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "doy {}..={}", self.start().get(), self.end().get())
    }
}
