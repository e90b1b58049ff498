//! Raw time-chunk fragments, their layout, and experiment-version tracks.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use drought_calendar::is_january;
use drought_grid::{GridCoords, GridError, HourlySeries};
use ndarray::{Array3, Zip};

use crate::error::AssembleError;
use crate::variable::RawVariable;

// ---------------------------------------------------------------------------
// FragmentKind / FragmentLayout
// ---------------------------------------------------------------------------

/// Which time chunk a fragment holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FragmentKind {
    /// The whole previous calendar year.
    PreviousYear,
    /// January 1 of the current year up to the start of the current month.
    CurrentYear,
    /// The current month so far.
    CurrentMonth,
}

impl FragmentKind {
    /// Every fragment kind, in merge order.
    pub const ALL: [FragmentKind; 3] = [Self::PreviousYear, Self::CurrentYear, Self::CurrentMonth];

    /// Suffix used in fragment file names.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Self::PreviousYear => "previous_year",
            Self::CurrentYear => "current_year",
            Self::CurrentMonth => "current_month",
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_suffix())
    }
}

/// The set of fragments an analysis date requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentLayout {
    /// January: the current month is the whole current year so far.
    TwoFragment,
    /// February onwards: previous year, rest of current year, current month.
    ThreeFragment,
}

impl FragmentLayout {
    /// Layout for an analysis date.
    pub fn for_analysis_date(date: NaiveDate) -> Self {
        if is_january(date) {
            Self::TwoFragment
        } else {
            Self::ThreeFragment
        }
    }

    /// Fragments that must be present, in merge order.
    pub fn required(self) -> &'static [FragmentKind] {
        match self {
            Self::TwoFragment => &[FragmentKind::PreviousYear, FragmentKind::CurrentMonth],
            Self::ThreeFragment => &FragmentKind::ALL,
        }
    }
}

// ---------------------------------------------------------------------------
// Fragment
// ---------------------------------------------------------------------------

/// Values of a fragment, optionally split into experiment-version tracks.
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentData {
    /// One value per point.
    Single(Array3<f64>),
    /// Final (`expver` 1) and provisional (`expver` 5) tracks; exactly one
    /// is non-missing at every point.
    Tracks {
        /// Final, quality-controlled values.
        final_values: Array3<f64>,
        /// Provisional near-real-time values.
        provisional: Array3<f64>,
    },
}

/// One hourly time chunk of a raw variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    kind: FragmentKind,
    times: Vec<NaiveDateTime>,
    coords: GridCoords,
    data: FragmentData,
}

impl Fragment {
    /// Create a fragment. Shapes are validated when it is resolved.
    pub fn new(
        kind: FragmentKind,
        times: Vec<NaiveDateTime>,
        coords: GridCoords,
        data: FragmentData,
    ) -> Self {
        Self {
            kind,
            times,
            coords,
            data,
        }
    }

    /// Which time chunk this is.
    pub fn kind(&self) -> FragmentKind {
        self.kind
    }

    /// Timestamps of the fragment.
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Whether the fragment carries two experiment-version tracks.
    pub fn has_tracks(&self) -> bool {
        matches!(self.data, FragmentData::Tracks { .. })
    }

    /// Collapse any tracks and return the fragment as an hourly series.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleError::TrackConflict`] if the tracks are not
    /// mutually exclusive and exhaustive, or [`AssembleError::Grid`] on a
    /// shape or time-axis problem.
    pub fn into_hourly(self, variable: RawVariable) -> Result<HourlySeries, AssembleError> {
        let values = match self.data {
            FragmentData::Single(values) => values,
            FragmentData::Tracks {
                final_values,
                provisional,
            } => collapse_tracks(variable, self.kind, &final_values, &provisional)?,
        };
        Ok(HourlySeries::new(self.times, self.coords, values)?)
    }
}

/// Merge two experiment-version tracks into one array.
///
/// At every point exactly one track must be non-missing; that value is
/// kept. The result therefore has no missing values.
///
/// # Errors
///
/// Returns [`AssembleError::TrackConflict`] with the number of points where
/// both tracks, or neither, hold a value.
pub fn collapse_tracks(
    variable: RawVariable,
    fragment: FragmentKind,
    final_values: &Array3<f64>,
    provisional: &Array3<f64>,
) -> Result<Array3<f64>, AssembleError> {
    if final_values.shape() != provisional.shape() {
        return Err(GridError::ShapeMismatch {
            what: format!("{variable} {fragment} provisional track"),
            expected: final_values.shape().to_vec(),
            got: provisional.shape().to_vec(),
        }
        .into());
    }

    let mut overlapping = 0usize;
    let mut missing = 0usize;
    let mut merged = Array3::zeros(final_values.raw_dim());
    Zip::from(&mut merged)
        .and(final_values)
        .and(provisional)
        .for_each(|out, &f, &p| match (f.is_nan(), p.is_nan()) {
            (false, true) => *out = f,
            (true, false) => *out = p,
            (false, false) => {
                overlapping += 1;
                *out = f;
            }
            (true, true) => {
                missing += 1;
                *out = f64::NAN;
            }
        });

    if overlapping > 0 || missing > 0 {
        return Err(AssembleError::TrackConflict {
            variable: variable.name(),
            fragment,
            overlapping,
            missing,
        });
    }
    Ok(merged)
}

// ---------------------------------------------------------------------------
// FragmentSet
// ---------------------------------------------------------------------------

/// The fragments delivered for one variable, keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct FragmentSet {
    fragments: BTreeMap<FragmentKind, Fragment>,
}

impl FragmentSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment, replacing any previous fragment of the same kind.
    pub fn with(mut self, fragment: Fragment) -> Self {
        self.insert(fragment);
        self
    }

    /// Add a fragment, replacing any previous fragment of the same kind.
    pub fn insert(&mut self, fragment: Fragment) {
        self.fragments.insert(fragment.kind(), fragment);
    }

    /// Whether a fragment of `kind` is present.
    pub fn contains(&self, kind: FragmentKind) -> bool {
        self.fragments.contains_key(&kind)
    }

    /// Remove and return the fragment of `kind`.
    pub fn take(&mut self, kind: FragmentKind) -> Option<Fragment> {
        self.fragments.remove(&kind)
    }

    /// Number of fragments present.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns `true` when no fragments are present.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
