//! Latitude orientation normalization.

use ndarray::{Array2, s};

/// Whether `values` is strictly increasing. Single-element axes are not.
pub fn is_increasing(values: &[f64]) -> bool {
    values.len() > 1 && values.windows(2).all(|w| w[1] > w[0])
}

/// Reverse the row (latitude) order of a `(latitude, longitude)` field.
pub fn flip_latitude(field: &Array2<f64>) -> Array2<f64> {
    field.slice(s![..;-1, ..]).to_owned()
}
