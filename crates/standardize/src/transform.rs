//! Zero-mass blend and normal quantile transform.

use drought_grid::GridError;
use ndarray::Array2;
use statrs::function::erf::erfc_inv;

use crate::error::StandardizeError;
use crate::params::ParameterSlice;

/// Probabilities are clamped to `[EPS, 1 - EPS]` before inversion.
pub const PROBABILITY_EPS: f64 = 1e-12;

/// Fraction of the non-missing observations that are exactly zero.
///
/// Returns `None` when there are no non-missing observations.
pub fn zero_probability(observations: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (zeros, valid) = observations
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0usize, 0usize), |(z, n), v| (z + usize::from(v == 0.0), n + 1));
    if valid == 0 {
        None
    } else {
        Some(zeros as f64 / valid as f64)
    }
}

/// Mixed probability `p0 + (1 - p0) * g`; missing if either term is.
pub fn blend_probability(p0: Option<f64>, g: Option<f64>) -> Option<f64> {
    match (p0, g) {
        (Some(p0), Some(g)) => Some(p0 + (1.0 - p0) * g),
        _ => None,
    }
}

/// Standard normal quantile of `p`, clamped to `[EPS, 1 - EPS]`.
pub fn normal_quantile(p: f64) -> f64 {
    let p = p.clamp(PROBABILITY_EPS, 1.0 - PROBABILITY_EPS);
    -std::f64::consts::SQRT_2 * erfc_inv(2.0 * p)
}

/// Standardize an accumulated quantity against one parameter slice.
///
/// The zero mass is evaluated per pixel from the single aggregate, so it
/// is either 0 or 1; a zero aggregate is therefore missing rather than
/// blended. Pixels with a missing or non-positive input, or with invalid
/// parameters, are missing in the output.
///
/// # Errors
///
/// Returns [`StandardizeError::Grid`] if the field and parameter grids
/// differ in shape.
pub fn standardize(
    aggregate: &Array2<f64>,
    params: ParameterSlice<'_>,
) -> Result<Array2<f64>, StandardizeError> {
    if aggregate.dim() != params.dim() {
        let (py, px) = params.dim();
        return Err(GridError::ShapeMismatch {
            what: "gamma parameters".to_string(),
            expected: aggregate.shape().to_vec(),
            got: vec![py, px],
        }
        .into());
    }
    Ok(Array2::from_shape_fn(aggregate.dim(), |(row, col)| {
        let x = aggregate[[row, col]];
        let p0 = zero_probability([x]);
        let g = if x > 0.0 {
            params.at(row, col).and_then(|p| p.cdf(x))
        } else {
            None
        };
        blend_probability(p0, g).map_or(f64::NAN, normal_quantile)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_probability_counts() {
        assert_eq!(zero_probability([0.0, 1.0, f64::NAN, 0.0]), Some(2.0 / 3.0));
        assert_eq!(zero_probability([f64::NAN]), None);
        assert_eq!(zero_probability(std::iter::empty()), None);
    }

    #[test]
    fn zero_probability_invariant_to_rescaling() {
        let obs = [0.0, 0.4, 2.5, 0.0, 7.0, f64::NAN];
        for k in [0.01, 3.0, 1e6] {
            assert_eq!(
                zero_probability(obs.iter().map(|v| v * k)),
                zero_probability(obs)
            );
        }
    }

    #[test]
    fn blend_requires_both_terms() {
        assert_eq!(blend_probability(Some(0.2), Some(0.5)), Some(0.6));
        assert_eq!(blend_probability(None, Some(0.5)), None);
        assert_eq!(blend_probability(Some(0.0), None), None);
    }

    #[test]
    fn quantiles() {
        assert_relative_eq!(normal_quantile(0.5), 0.0, epsilon = 1e-12);
        assert_relative_eq!(normal_quantile(0.975), 1.959963984540054, epsilon = 1e-9);
        assert_relative_eq!(normal_quantile(0.025), -1.959963984540054, epsilon = 1e-9);
        assert!(normal_quantile(1.0).is_finite());
        assert!(normal_quantile(0.0).is_finite());
        assert!(normal_quantile(1.0) > 7.0);
    }
}
