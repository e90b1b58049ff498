//! # drought-grid
//!
//! Data model for gridded reanalysis fields over a latitude/longitude
//! domain, plus the numeric primitives applied to them during index
//! post-processing.
//!
//! Arrays are `ndarray` arrays in `(time, latitude, longitude)` or
//! `(latitude, longitude)` order. Missing values are `f64::NAN`.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `coords` | Latitude/longitude axes, compatibility and bounding boxes |
//! | `series` | Hourly and daily 3-D series |
//! | `reduce` | NaN-skipping reductions and rounding |
//! | `smooth` | Gaussian smoothing along the time axis |
//! | `mask` | Land/sea masking |
//! | `orient` | Latitude orientation normalization |
//! | `error` | Error types |

mod coords;
mod error;
mod mask;
mod orient;
mod reduce;
mod series;
mod smooth;

pub use coords::{BoundingBox, GridCoords};
pub use error::GridError;
pub use mask::LandMask;
pub use orient::{flip_latitude, is_increasing};
pub use reduce::{nan_mean, nan_mean_time, nan_sum, nan_sum_time, round_decimals};
pub use series::{DailySeries, HourlySeries};
pub use smooth::{gaussian_kernel, smooth_time_at};

/// A 2-D `(latitude, longitude)` grid of values.
pub type Field = ndarray::Array2<f64>;

/// Builds an all-missing field of the given `(latitude, longitude)` shape.
pub fn missing_field(shape: (usize, usize)) -> Field {
    Field::from_elem(shape, f64::NAN)
}
