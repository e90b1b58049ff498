//! Merge hourly fragments on their shared axes.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use drought_grid::HourlySeries;
use ndarray::{Array3, Axis, Zip};

use crate::error::AssembleError;

/// Relative tolerance under which two values at a shared timestamp agree.
const AGREEMENT_TOLERANCE: f64 = 1e-9;

fn values_agree(a: f64, b: f64) -> bool {
    (a - b).abs() <= AGREEMENT_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// Merge fragments into one hourly series over the union of their
/// timestamps.
///
/// Where fragments share a timestamp, values combine point-wise: a missing
/// value yields to a present one and equal values merge. Two different
/// present values are a conflict.
///
/// # Errors
///
/// Returns [`AssembleError::NoFragments`] for an empty input,
/// [`AssembleError::Grid`] if the grids differ, or
/// [`AssembleError::MergeConflict`] at the first conflicting timestamp.
pub fn merge_fragments(
    variable: &'static str,
    parts: &[HourlySeries],
) -> Result<HourlySeries, AssembleError> {
    let Some(first) = parts.first() else {
        return Err(AssembleError::NoFragments { variable });
    };
    let coords = first.coords().clone();
    for part in &parts[1..] {
        coords.ensure_compatible(part.coords(), &format!("{variable} fragment merge"))?;
    }

    // Each output timestamp lists the (part, time index) pairs that supply it.
    let mut sources: BTreeMap<NaiveDateTime, Vec<(usize, usize)>> = BTreeMap::new();
    for (p, part) in parts.iter().enumerate() {
        for (t, &time) in part.times().iter().enumerate() {
            sources.entry(time).or_default().push((p, t));
        }
    }

    let (ny, nx) = coords.shape();
    let mut values = Array3::from_elem((sources.len(), ny, nx), f64::NAN);
    for (t_out, (time, supply)) in sources.iter().enumerate() {
        let mut slot = values.index_axis_mut(Axis(0), t_out);
        let mut conflicts = 0usize;
        for &(p, t) in supply {
            let src = parts[p].values().index_axis(Axis(0), t);
            Zip::from(&mut slot).and(&src).for_each(|out, &v| {
                if v.is_nan() {
                    return;
                }
                if out.is_nan() {
                    *out = v;
                } else if !values_agree(*out, v) {
                    conflicts += 1;
                }
            });
        }
        if conflicts > 0 {
            return Err(AssembleError::MergeConflict {
                variable,
                time: *time,
                count: conflicts,
            });
        }
    }

    let times: Vec<NaiveDateTime> = sources.into_keys().collect();
    Ok(HourlySeries::new(times, coords, values)?)
}
