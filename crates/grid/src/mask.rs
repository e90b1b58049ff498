//! Land/sea masking.

use ndarray::{Array2, Zip};

use crate::coords::GridCoords;
use crate::error::GridError;

/// Boolean land mask derived from a land-fraction grid.
///
/// A pixel is land when its fraction is strictly greater than the
/// threshold. Missing fractions count as sea.
#[derive(Debug, Clone, PartialEq)]
pub struct LandMask {
    coords: GridCoords,
    land: Array2<bool>,
}

impl LandMask {
    /// Threshold a land-fraction grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if `fraction` does not match
    /// `coords`.
    pub fn from_fraction(
        coords: GridCoords,
        fraction: &Array2<f64>,
        threshold: f64,
    ) -> Result<Self, GridError> {
        let (ny, nx) = coords.shape();
        if fraction.dim() != (ny, nx) {
            return Err(GridError::ShapeMismatch {
                what: "land fraction".into(),
                expected: vec![ny, nx],
                got: fraction.shape().to_vec(),
            });
        }
        let land = fraction.mapv(|f| f > threshold);
        Ok(Self { coords, land })
    }

    /// Grid axes of the mask.
    pub fn coords(&self) -> &GridCoords {
        &self.coords
    }

    /// `true` for land pixels.
    pub fn land(&self) -> &Array2<bool> {
        &self.land
    }

    /// Number of land pixels.
    pub fn n_land(&self) -> usize {
        self.land.iter().filter(|&&l| l).count()
    }

    /// Set every non-land pixel of `field` to NaN.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if `field` does not match the
    /// mask.
    pub fn apply(&self, field: &mut Array2<f64>) -> Result<(), GridError> {
        if field.dim() != self.land.dim() {
            return Err(GridError::ShapeMismatch {
                what: "masked field".into(),
                expected: self.land.shape().to_vec(),
                got: field.shape().to_vec(),
            });
        }
        Zip::from(field).and(&self.land).for_each(|v, &is_land| {
            if !is_land {
                *v = f64::NAN;
            }
        });
        Ok(())
    }
}
