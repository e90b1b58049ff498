//! Placeholders, land masking and rounding of computed indices.

use drought_grid::{GridCoords, LandMask, missing_field, round_decimals};
use tracing::debug;

use crate::error::IndexError;
use crate::kind::{IndexKind, Interval};
use crate::results::IndexResults;

/// Decimal places kept in the outputs.
pub const OUTPUT_DECIMALS: i32 = 1;

/// Finalize the computed indices in place.
///
/// 1. Indices without a 1-day definition get an all-missing 1-day field.
/// 2. Land-only indices are set to missing over non-land pixels at every
///    interval.
/// 3. Every value is rounded to [`OUTPUT_DECIMALS`] places.
///
/// # Errors
///
/// Returns [`IndexError::Grid`] if the mask is not on `coords`.
pub fn postprocess(
    results: &mut IndexResults,
    coords: &GridCoords,
    mask: &LandMask,
) -> Result<(), IndexError> {
    coords.ensure_compatible(mask.coords(), "land mask")?;

    for kind in IndexKind::ALL {
        if !kind.defined_at_one_day() && !results.contains(kind, Interval::ONE_DAY) {
            results.insert(kind, Interval::ONE_DAY, missing_field(coords.shape()))?;
        }
    }

    for (kind, interval, field) in results.iter_mut() {
        if kind.land_only() {
            mask.apply(field)?;
            debug!(index = %kind, %interval, land = mask.n_land(), "masked to land");
        }
        field.mapv_inplace(|v| round_decimals(v, OUTPUT_DECIMALS));
    }
    Ok(())
}
