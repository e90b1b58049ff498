//! Day-of-year climatology references and windowed aggregation.

use drought_calendar::DoyWindow;
use drought_grid::{Field, GridCoords, nan_mean_time, nan_sum_time};
use ndarray::{Array3, Axis};

use crate::error::IndexError;

/// How reference days combine over a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Sum of the daily normals (accumulated quantities).
    Sum,
    /// Mean of the daily normals (states).
    Mean,
}

/// Long-term daily normals over `(day-of-year, lat, lon)`.
///
/// The leading axis holds day 1 at index 0. A 365-day reference has no
/// entry for day 366.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimatologyReference {
    name: &'static str,
    coords: GridCoords,
    values: Array3<f64>,
}

impl ClimatologyReference {
    /// Create a reference.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::ReferenceLength`] if the leading axis is not
    /// 365 or 366 long, or [`IndexError::Grid`] if the grid axes do not
    /// match the values.
    pub fn new(
        name: &'static str,
        coords: GridCoords,
        values: Array3<f64>,
    ) -> Result<Self, IndexError> {
        let (n_doy, ny, nx) = values.dim();
        if !(365..=366).contains(&n_doy) {
            return Err(IndexError::ReferenceLength { what: name, len: n_doy });
        }
        if coords.shape() != (ny, nx) {
            let (ey, ex) = coords.shape();
            return Err(drought_grid::GridError::ShapeMismatch {
                what: format!("{name} climatology"),
                expected: vec![n_doy, ey, ex],
                got: vec![n_doy, ny, nx],
            }
            .into());
        }
        Ok(Self {
            name,
            coords,
            values,
        })
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Grid axes.
    pub fn coords(&self) -> &GridCoords {
        &self.coords
    }

    /// Last day-of-year held (365 or 366).
    pub fn last_doy(&self) -> u16 {
        self.values.len_of(Axis(0)) as u16
    }

    /// Per-pixel aggregate of the reference over `window`.
    ///
    /// A wrapped window covers `[1, end]` and `[start, last_doy]`. Pixels
    /// whose reference values are all missing are missing.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::WindowBeyondReference`] if a contiguous window
    /// ends after the last reference day.
    pub fn aggregate(&self, window: DoyWindow, aggregation: Aggregation) -> Result<Field, IndexError> {
        let last_doy = self.last_doy();
        if !window.is_wrapped() && window.end().get() > last_doy {
            return Err(IndexError::WindowBeyondReference { window, last_doy });
        }
        let indices: Vec<usize> = window
            .doys(last_doy)
            .into_iter()
            .map(|d| d.index())
            .collect();
        let selected = self.values.select(Axis(0), &indices);
        Ok(match aggregation {
            Aggregation::Sum => nan_sum_time(selected.view()),
            Aggregation::Mean => nan_mean_time(selected.view()),
        })
    }
}
