//! Gaussian smoothing along the time axis.
//!
//! Matches a one-dimensional Gaussian filter with the kernel truncated at
//! four standard deviations and `reflect` boundary handling
//! (`d c b a | a b c d | d c b a`). Only the time axis is smoothed.

use ndarray::{Array2, ArrayView3, Axis};

use crate::error::GridError;

/// Number of standard deviations at which the kernel is cut off.
const TRUNCATE: f64 = 4.0;

/// Normalized Gaussian weights for offsets `-r..=r`, `r = round(4 * sigma)`.
///
/// # Errors
///
/// Returns [`GridError::InvalidSigma`] if `sigma` is not finite and positive.
pub fn gaussian_kernel(sigma: f64) -> Result<Vec<f64>, GridError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(GridError::InvalidSigma { sigma });
    }
    let radius = (TRUNCATE * sigma + 0.5) as i64;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|k| (-0.5 * (k * k) as f64 / (sigma * sigma)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    Ok(weights.into_iter().map(|w| w / total).collect())
}

/// Maps an out-of-range position back into `0..len` by mirror reflection.
fn reflect(mut idx: i64, len: i64) -> usize {
    let period = 2 * len;
    idx = idx.rem_euclid(period);
    if idx >= len {
        idx = period - idx - 1;
    }
    idx as usize
}

/// Gaussian-smoothed value of every pixel at time index `t`.
///
/// Missing values propagate: a pixel whose kernel footprint touches a NaN
/// is NaN.
///
/// # Errors
///
/// Returns [`GridError::InvalidSigma`] for a bad `sigma`, or
/// [`GridError::TimeIndexOutOfRange`] if `t` is outside the series.
pub fn smooth_time_at(
    values: ArrayView3<'_, f64>,
    t: usize,
    sigma: f64,
) -> Result<Array2<f64>, GridError> {
    let len = values.len_of(Axis(0));
    if t >= len {
        return Err(GridError::TimeIndexOutOfRange { index: t, len });
    }
    let kernel = gaussian_kernel(sigma)?;
    let radius = (kernel.len() / 2) as i64;
    let positions: Vec<usize> = (-radius..=radius)
        .map(|k| reflect(t as i64 + k, len as i64))
        .collect();

    Ok(values.map_axis(Axis(0), |lane| {
        kernel
            .iter()
            .zip(&positions)
            .map(|(w, &p)| w * lane[p])
            .sum()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array3;

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(1.0).unwrap();
        assert_eq!(k.len(), 9);
        assert_relative_eq!(k.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(k[0], k[8]);
        assert!(k[4] > k[3]);
    }

    #[test]
    fn invalid_sigma() {
        assert!(gaussian_kernel(0.0).is_err());
        assert!(gaussian_kernel(f64::NAN).is_err());
    }

    #[test]
    fn reflect_indices() {
        assert_eq!(reflect(-1, 5), 0);
        assert_eq!(reflect(-2, 5), 1);
        assert_eq!(reflect(5, 5), 4);
        assert_eq!(reflect(6, 5), 3);
        assert_eq!(reflect(2, 5), 2);
    }

    #[test]
    fn constant_series_is_unchanged() {
        let values = Array3::from_elem((10, 2, 2), 3.5);
        let out = smooth_time_at(values.view(), 9, 2.0).unwrap();
        for v in out.iter() {
            assert_relative_eq!(*v, 3.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn last_day_spike_is_damped() {
        let mut values = Array3::zeros((20, 1, 1));
        values[[19, 0, 0]] = 10.0;
        let out = smooth_time_at(values.view(), 19, 1.0).unwrap();
        // Reflection mirrors the spike onto itself: weight k[0] + k[1].
        let k = gaussian_kernel(1.0).unwrap();
        assert_relative_eq!(out[[0, 0]], 10.0 * (k[4] + k[5]), epsilon = 1e-12);
        assert!(out[[0, 0]] < 10.0);
    }

    #[test]
    fn linear_trend_preserved_in_interior() {
        let values = Array3::from_shape_fn((30, 1, 1), |(t, _, _)| t as f64);
        let out = smooth_time_at(values.view(), 15, 2.0).unwrap();
        assert_relative_eq!(out[[0, 0]], 15.0, epsilon = 1e-9);
    }

    #[test]
    fn out_of_range_index() {
        let values = Array3::<f64>::zeros((3, 1, 1));
        assert!(smooth_time_at(values.view(), 3, 1.0).is_err());
    }
}
