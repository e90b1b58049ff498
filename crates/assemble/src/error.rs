//! Error types for the drought-assemble crate.

use chrono::{NaiveDate, NaiveDateTime};
use drought_calendar::CalendarError;
use drought_grid::GridError;

use crate::fragment::FragmentKind;

/// Error type for all fallible operations in the drought-assemble crate.
///
/// Every variant indicates an upstream acquisition defect that assembly
/// cannot repair; none are retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssembleError {
    /// Returned when a fragment required by the layout is absent.
    #[error("{variable}: required fragment '{fragment}' is missing")]
    MissingFragment {
        /// Variable being assembled.
        variable: &'static str,
        /// The absent fragment.
        fragment: FragmentKind,
    },

    /// Returned when experiment-version tracks are not mutually exclusive
    /// and jointly exhaustive.
    #[error(
        "{variable}: experiment-version tracks in '{fragment}' are inconsistent: \
         {overlapping} point(s) with both tracks present, {missing} with neither"
    )]
    TrackConflict {
        /// Variable being assembled.
        variable: &'static str,
        /// Fragment holding the tracks.
        fragment: FragmentKind,
        /// Points where both tracks hold a value.
        overlapping: usize,
        /// Points where neither track holds a value.
        missing: usize,
    },

    /// Returned when two fragments disagree at a shared timestamp.
    #[error("{variable}: fragments disagree at {time} in {count} pixel(s)")]
    MergeConflict {
        /// Variable being assembled.
        variable: &'static str,
        /// First conflicting timestamp.
        time: NaiveDateTime,
        /// Number of conflicting pixels at that timestamp.
        count: usize,
    },

    /// Returned when the daily series does not reach back to the window
    /// start or forward to the analysis date.
    #[error(
        "{variable}: daily data covers {first:?}..{last:?}, \
         window {start}..{end} is not covered"
    )]
    WindowNotCovered {
        /// Variable being assembled.
        variable: &'static str,
        /// First available day.
        first: Option<NaiveDate>,
        /// Last available day.
        last: Option<NaiveDate>,
        /// First day of the required window.
        start: NaiveDate,
        /// Analysis date.
        end: NaiveDate,
    },

    /// Returned when the window has a missing day.
    #[error("{variable}: daily window has a gap after {after}")]
    WindowGap {
        /// Variable being assembled.
        variable: &'static str,
        /// Last day before the gap.
        after: NaiveDate,
    },

    /// Returned when there is nothing to merge.
    #[error("{variable}: no fragments to merge")]
    NoFragments {
        /// Variable being assembled.
        variable: &'static str,
    },

    /// Wraps a grid construction failure.
    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    /// Wraps a calendar arithmetic failure.
    #[error("calendar error: {0}")]
    Calendar(#[from] CalendarError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_fragment() {
        let err = AssembleError::MissingFragment {
            variable: "tp",
            fragment: FragmentKind::CurrentYear,
        };
        assert_eq!(
            err.to_string(),
            "tp: required fragment 'current_year' is missing"
        );
    }

    #[test]
    fn display_track_conflict() {
        let err = AssembleError::TrackConflict {
            variable: "sd",
            fragment: FragmentKind::CurrentYear,
            overlapping: 3,
            missing: 0,
        };
        assert!(err.to_string().starts_with("sd: experiment-version tracks"));
        assert!(err.to_string().contains("3 point(s) with both"));
    }

    #[test]
    fn from_grid_error() {
        let err: AssembleError = GridError::EmptyAxis { axis: "latitude" }.into();
        assert!(matches!(err, AssembleError::Grid(_)));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<AssembleError>();
    }
}
