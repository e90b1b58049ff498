//! Gamma-to-normal standardization of accumulated water quantities.
//!
//! This crate turns a per-pixel accumulated quantity (mean precipitation or
//! mean water budget over a trailing interval) into a standard-normal index
//! value, using gamma parameters fitted per interval and day-of-year over a
//! reference period.
//!
//! # Pipeline
//!
//! 1. **Select** the parameters for the day-of-year of the most recent day
//! 2. **CDF**: three-parameter gamma CDF of every strictly positive input
//! 3. **Blend** with the zero-probability: `p = p0 + (1 - p0) * G`
//! 4. **Invert** the standard normal CDF after clamping `p` away from 0 and 1
//!
//! Missing inputs, zero inputs and invalid per-pixel parameters yield
//! missing outputs.
//!
//! # Glossary
//!
//! - **p0**: probability mass at zero, from the pixel's own observations
//! - **G**: gamma CDF `P(a, (x - loc) / scale)`
//! - **Φ⁻¹**: standard normal quantile function

mod error;
mod gamma;
mod params;
mod transform;

pub use error::StandardizeError;
pub use gamma::GammaParams;
pub use params::{GammaParameterSet, ParameterGrid, ParameterSlice};
pub use transform::{
    PROBABILITY_EPS, blend_probability, normal_quantile, standardize, zero_probability,
};
