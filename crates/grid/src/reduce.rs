//! NaN-skipping reductions and rounding.

use ndarray::{Array2, ArrayView3, Axis};

/// Sum of the non-missing values, or NaN when every value is missing.
pub fn nan_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { f64::NAN } else { sum }
}

/// Mean of the non-missing values, or NaN when every value is missing.
pub fn nan_mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// Per-pixel [`nan_sum`] over the time axis of a `(time, lat, lon)` view.
pub fn nan_sum_time(values: ArrayView3<'_, f64>) -> Array2<f64> {
    values.map_axis(Axis(0), |lane| nan_sum(lane.iter().copied()))
}

/// Per-pixel [`nan_mean`] over the time axis of a `(time, lat, lon)` view.
pub fn nan_mean_time(values: ArrayView3<'_, f64>) -> Array2<f64> {
    values.map_axis(Axis(0), |lane| nan_mean(lane.iter().copied()))
}

/// Round to `decimals` places, half away from zero. NaN stays NaN.
pub fn round_decimals(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
