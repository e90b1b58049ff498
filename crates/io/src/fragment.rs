//! Raw reanalysis fragment reader.

use std::path::{Path, PathBuf};

use drought_assemble::{Fragment, FragmentData, FragmentKind, FragmentSet, RawVariable};
use ndarray::{Array3, Axis, Ix3};
use tracing::debug;

use crate::error::IoError;
use crate::netcdf_read::{self, LAT_ALIASES, LON_ALIASES, TIME_ALIASES};

/// `expver` code of the final, quality-controlled track.
const EXPVER_FINAL: f64 = 1.0;
/// `expver` code of the provisional near-real-time track.
const EXPVER_PROVISIONAL: f64 = 5.0;

/// Path of a fragment file: `{input_dir}/{prefix}_{kind}.nc`.
pub fn fragment_path(input_dir: &Path, variable: RawVariable, kind: FragmentKind) -> PathBuf {
    input_dir.join(format!("{}_{}.nc", variable.file_prefix(), kind.file_suffix()))
}

fn to_array3(values: ndarray::ArrayD<f64>, name: &str) -> Result<Array3<f64>, IoError> {
    let ndim = values.ndim();
    values
        .into_dimensionality::<Ix3>()
        .map_err(|_| IoError::DimensionMismatch {
            name: format!("{name} rank"),
            expected: 3,
            got: ndim,
        })
}

/// Read one fragment of `variable`.
///
/// Values are unpacked with `scale_factor` / `add_offset`; `_FillValue` and
/// `missing_value` become NaN. A variable with an `expver` dimension of
/// length 2 is split into its final (`expver` 1) and provisional
/// (`expver` 5) tracks.
///
/// # Errors
///
/// Returns [`IoError`] if the file, variable, axes or time units are
/// missing or malformed.
pub fn read_fragment(
    path: &Path,
    variable: RawVariable,
    kind: FragmentKind,
) -> Result<Fragment, IoError> {
    let file = netcdf_read::open_file(path)?;
    let coords = netcdf_read::read_coords(&file, path)?;
    let times = netcdf_read::read_times(&file, path)?;
    let array = netcdf_read::read_array(&file, variable.name(), path)?;

    let t = array.require_axis(TIME_ALIASES, path)?;
    let y = array.require_axis(LAT_ALIASES, path)?;
    let x = array.require_axis(LON_ALIASES, path)?;
    let expected_rank = if array.axis(&["expver"]).is_some() { 4 } else { 3 };
    if array.values.ndim() != expected_rank {
        return Err(IoError::DimensionMismatch {
            name: format!("{} rank", variable.name()),
            expected: expected_rank,
            got: array.values.ndim(),
        });
    }

    let data = match array.axis(&["expver"]) {
        None => FragmentData::Single(to_array3(array.permuted(&[t, y, x]), variable.name())?),
        Some(e) => {
            let n_tracks = array.values.len_of(Axis(e));
            let stacked = array.permuted(&[t, e, y, x]);
            if n_tracks == 1 {
                let single = stacked.index_axis_move(Axis(1), 0);
                FragmentData::Single(to_array3(single, variable.name())?)
            } else {
                // Older files store the codes as numbers; otherwise assume
                // final then provisional.
                let codes = netcdf_read::read_1d_f64(&file, &["expver"], path).ok();
                let position = |code: f64, fallback: usize| {
                    codes
                        .as_ref()
                        .and_then(|c| c.iter().position(|&v| v == code))
                        .unwrap_or(fallback)
                };
                let fi = position(EXPVER_FINAL, 0);
                let pi = position(EXPVER_PROVISIONAL, 1);
                if fi >= n_tracks || pi >= n_tracks || fi == pi {
                    return Err(IoError::InvalidCoordinate {
                        name: "expver".to_string(),
                        reason: format!("cannot locate tracks 1 and 5 among {n_tracks}"),
                    });
                }
                debug!(variable = variable.name(), fragment = %kind, "split expver tracks");
                FragmentData::Tracks {
                    final_values: to_array3(
                        stacked.index_axis(Axis(1), fi).to_owned(),
                        variable.name(),
                    )?,
                    provisional: to_array3(
                        stacked.index_axis(Axis(1), pi).to_owned(),
                        variable.name(),
                    )?,
                }
            }
        }
    };
    Ok(Fragment::new(kind, times, coords, data))
}

/// Read every fragment file of `variable` present in `input_dir`.
///
/// Absent files are skipped; the assembler decides which are required.
///
/// # Errors
///
/// Returns [`IoError`] if a present file cannot be read.
pub fn read_fragment_set(input_dir: &Path, variable: RawVariable) -> Result<FragmentSet, IoError> {
    let mut set = FragmentSet::new();
    for kind in FragmentKind::ALL {
        let path = fragment_path(input_dir, variable, kind);
        if !path.exists() {
            debug!(variable = variable.name(), fragment = %kind, "fragment file absent");
            continue;
        }
        set.insert(read_fragment(&path, variable, kind)?);
    }
    Ok(set)
}
