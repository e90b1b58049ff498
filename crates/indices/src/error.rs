//! Error types for the drought-indices crate.

use drought_calendar::{CalendarError, DoyWindow};
use drought_grid::GridError;
use drought_standardize::StandardizeError;

use crate::kind::{IndexKind, Interval};

/// Error type for all fallible operations in the drought-indices crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndexError {
    /// Returned when an interval length is outside 1..=365.
    #[error("invalid interval: {days} days (must be 1..=365)")]
    InvalidInterval {
        /// The requested number of days.
        days: u32,
    },

    /// Returned when a result is written twice.
    #[error("{index} at {interval} was already computed")]
    DuplicateResult {
        /// Index being written.
        index: IndexKind,
        /// Interval being written.
        interval: Interval,
    },

    /// Returned when a result is read before it was written.
    #[error("{index} at {interval} has not been computed")]
    MissingResult {
        /// Index being read.
        index: IndexKind,
        /// Interval being read.
        interval: Interval,
    },

    /// Returned when a processor runs before an index it depends on.
    #[error("{index} requires {requires} at {interval}, which has not been computed")]
    MissingRequirement {
        /// Index whose processor was refused.
        index: IndexKind,
        /// The absent prerequisite.
        requires: IndexKind,
        /// Interval at which the prerequisite is absent.
        interval: Interval,
    },

    /// Returned when a climatology's day-of-year axis is not 365 or 366
    /// long.
    #[error("{what} climatology has {len} days, expected 365 or 366")]
    ReferenceLength {
        /// Which climatology.
        what: &'static str,
        /// Length of its leading axis.
        len: usize,
    },

    /// Returned when a contiguous window extends past a reference's last
    /// day.
    #[error("{window} extends past the last reference day {last_doy}")]
    WindowBeyondReference {
        /// The requested window.
        window: DoyWindow,
        /// Last day-of-year the reference holds.
        last_doy: u16,
    },

    /// Returned when a daily series is shorter than an interval.
    #[error("{what} series has {len} days, shorter than the {interval} interval")]
    SeriesTooShort {
        /// Which series.
        what: &'static str,
        /// Requested interval.
        interval: Interval,
        /// Available days.
        len: usize,
    },

    /// Returned when a series does not end on the analysis date.
    #[error("{what} series ends {last:?}, expected the analysis date")]
    SeriesNotAligned {
        /// Which series.
        what: &'static str,
        /// Last date in the series.
        last: Option<chrono::NaiveDate>,
    },

    /// Returned when a processing setting is invalid.
    #[error("invalid setting: {reason}")]
    InvalidSetting {
        /// Description of the problem.
        reason: String,
    },

    /// Returned on a calendar computation failure.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// Returned on a grid shape or axis problem.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Returned when standardization fails.
    #[error(transparent)]
    Standardize(#[from] StandardizeError),
}
