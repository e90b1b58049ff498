//! Hourly and daily 3-D series over `(time, latitude, longitude)`.

use std::ops::Range;

use chrono::{NaiveDate, NaiveDateTime};
use ndarray::{Array3, ArrayView3, Zip, s};

use crate::coords::GridCoords;
use crate::error::GridError;

fn check_shape(
    what: &str,
    n_time: usize,
    coords: &GridCoords,
    values: &Array3<f64>,
) -> Result<(), GridError> {
    let (ny, nx) = coords.shape();
    let expected = [n_time, ny, nx];
    if values.shape() != expected {
        return Err(GridError::ShapeMismatch {
            what: what.to_string(),
            expected: expected.to_vec(),
            got: values.shape().to_vec(),
        });
    }
    Ok(())
}

fn check_increasing<T: PartialOrd>(times: &[T]) -> Result<(), GridError> {
    match times.windows(2).position(|w| w[1] <= w[0]) {
        Some(i) => Err(GridError::NonMonotonicTime { index: i + 1 }),
        None => Ok(()),
    }
}

fn combine_values(
    a: &Array3<f64>,
    b: &Array3<f64>,
    f: impl Fn(f64, f64) -> f64,
) -> Array3<f64> {
    let mut out = Array3::zeros(a.raw_dim());
    Zip::from(&mut out)
        .and(a)
        .and(b)
        .for_each(|o, &x, &y| *o = f(x, y));
    out
}

// ---------------------------------------------------------------------------
// HourlySeries
// ---------------------------------------------------------------------------

/// Sub-daily values with strictly increasing timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries {
    times: Vec<NaiveDateTime>,
    coords: GridCoords,
    values: Array3<f64>,
}

impl HourlySeries {
    /// Create a new `HourlySeries`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if `values` is not
    /// `[times.len(), n_lat, n_lon]`, or [`GridError::NonMonotonicTime`] if
    /// the timestamps are not strictly increasing.
    pub fn new(
        times: Vec<NaiveDateTime>,
        coords: GridCoords,
        values: Array3<f64>,
    ) -> Result<Self, GridError> {
        check_shape("hourly series", times.len(), &coords, &values)?;
        check_increasing(&times)?;
        Ok(Self {
            times,
            coords,
            values,
        })
    }

    /// Timestamps.
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Grid axes.
    pub fn coords(&self) -> &GridCoords {
        &self.coords
    }

    /// Values in `(time, latitude, longitude)` order.
    pub fn values(&self) -> &Array3<f64> {
        &self.values
    }

    /// Number of timestamps.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns `true` when the series holds no timestamps.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Point-wise combination with a series on identical axes.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CoordinateMismatch`] if the timestamps or grid
    /// axes differ.
    pub fn combine(
        &self,
        other: &HourlySeries,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<HourlySeries, GridError> {
        self.coords.ensure_compatible(&other.coords, "hourly combine")?;
        if self.times != other.times {
            return Err(GridError::CoordinateMismatch {
                what: format!(
                    "hourly combine: timestamps differ ({} vs {} steps)",
                    self.times.len(),
                    other.times.len()
                ),
            });
        }
        Ok(Self {
            times: self.times.clone(),
            coords: self.coords.clone(),
            values: combine_values(&self.values, &other.values, f),
        })
    }
}

// ---------------------------------------------------------------------------
// DailySeries
// ---------------------------------------------------------------------------

/// Daily values with strictly increasing calendar dates.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    dates: Vec<NaiveDate>,
    coords: GridCoords,
    values: Array3<f64>,
}

impl DailySeries {
    /// Create a new `DailySeries`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if `values` is not
    /// `[dates.len(), n_lat, n_lon]`, or [`GridError::NonMonotonicTime`] if
    /// the dates are not strictly increasing.
    pub fn new(
        dates: Vec<NaiveDate>,
        coords: GridCoords,
        values: Array3<f64>,
    ) -> Result<Self, GridError> {
        check_shape("daily series", dates.len(), &coords, &values)?;
        check_increasing(&dates)?;
        Ok(Self {
            dates,
            coords,
            values,
        })
    }

    /// Calendar dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Grid axes.
    pub fn coords(&self) -> &GridCoords {
        &self.coords
    }

    /// Values in `(time, latitude, longitude)` order.
    pub fn values(&self) -> &Array3<f64> {
        &self.values
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns `true` when the series holds no days.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Most recent date, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Index of the first date that does not follow its predecessor by
    /// exactly one day.
    pub fn first_gap(&self) -> Option<usize> {
        self.dates
            .windows(2)
            .position(|w| (w[1] - w[0]).num_days() != 1)
            .map(|i| i + 1)
    }

    /// The sub-series covering `range` of time indices.
    ///
    /// # Panics
    ///
    /// Panics if `range` exceeds the series length.
    pub fn select(&self, range: Range<usize>) -> DailySeries {
        Self {
            dates: self.dates[range.clone()].to_vec(),
            coords: self.coords.clone(),
            values: self.values.slice(s![range, .., ..]).to_owned(),
        }
    }

    /// View over the most recent `days` time steps.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::TimeIndexOutOfRange`] if the series is shorter
    /// than `days` or `days` is zero.
    pub fn trailing(&self, days: usize) -> Result<ArrayView3<'_, f64>, GridError> {
        let len = self.len();
        if days == 0 || days > len {
            return Err(GridError::TimeIndexOutOfRange { index: days, len });
        }
        Ok(self.values.slice(s![len - days.., .., ..]))
    }

    /// Point-wise combination with a series on identical axes.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CoordinateMismatch`] if the dates or grid axes
    /// differ.
    pub fn combine(
        &self,
        other: &DailySeries,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<DailySeries, GridError> {
        self.coords.ensure_compatible(&other.coords, "daily combine")?;
        if self.dates != other.dates {
            return Err(GridError::CoordinateMismatch {
                what: format!(
                    "daily combine: dates differ ({:?}..{:?} vs {:?}..{:?})",
                    self.dates.first(),
                    self.dates.last(),
                    other.dates.first(),
                    other.dates.last()
                ),
            });
        }
        Ok(Self {
            dates: self.dates.clone(),
            coords: self.coords.clone(),
            values: combine_values(&self.values, &other.values, f),
        })
    }
}
