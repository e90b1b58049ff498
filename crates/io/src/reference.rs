//! Climatology, gamma-parameter and land-mask readers.

use std::path::Path;

use drought_calendar::Doy;
use drought_grid::{GridCoords, LandMask};
use drought_indices::ClimatologyReference;
use drought_standardize::{GammaParameterSet, ParameterGrid};
use ndarray::{Array2, Array3, ArrayD, Axis, Ix2, Ix3};
use tracing::info;

use crate::error::IoError;
use crate::netcdf_read::{self, LAT_ALIASES, LON_ALIASES};

/// Name of the gamma parameter variable.
pub const PARAMS_VAR: &str = "params";
/// Name of the land-sea mask variable.
pub const LSM_VAR: &str = "lsm";
/// Number of gamma parameters along `dparams`: `a`, `loc`, `scale`.
const N_DPARAMS: usize = 3;

fn reference_coords(file: &netcdf::File, path: &Path) -> Result<GridCoords, IoError> {
    Ok(netcdf_read::read_coords(file, path)?.with_remapped_longitudes())
}

/// `v` as a whole number, or [`IoError::InvalidCoordinate`] for `name`.
fn whole_number(name: &str, v: f64) -> Result<f64, IoError> {
    if v.is_finite() && v.fract() == 0.0 {
        Ok(v)
    } else {
        Err(IoError::InvalidCoordinate {
            name: name.to_string(),
            reason: format!("{v} is not a whole number"),
        })
    }
}

/// Check the labels of a climatology's day axis.
///
/// A day-of-year coordinate must read `1..=n` in order. A CF time axis
/// (`<unit> since <date>`) or an axis without a coordinate variable is
/// taken by position.
fn check_day_labels(file: &netcdf::File, dim: &str, n_days: usize) -> Result<(), IoError> {
    let Some(var) = file.variable(dim) else {
        return Ok(());
    };
    if netcdf_read::attr_string(&var, "units").is_some_and(|u| u.contains(" since ")) {
        return Ok(());
    }
    let labels = var.get_values::<f64, _>(..)?;
    if labels.len() != n_days {
        return Err(IoError::DimensionMismatch {
            name: dim.to_string(),
            expected: n_days,
            got: labels.len(),
        });
    }
    if let Some((k, label)) = labels
        .iter()
        .enumerate()
        .find(|&(k, &label)| label != (k + 1) as f64)
    {
        return Err(IoError::InvalidCoordinate {
            name: dim.to_string(),
            reason: format!("entry {k} is labelled {label}, expected day-of-year {}", k + 1),
        });
    }
    Ok(())
}

fn dimensionality<D: ndarray::Dimension>(
    values: ArrayD<f64>,
    name: &str,
) -> Result<ndarray::Array<f64, D>, IoError> {
    let got = values.ndim();
    values
        .into_dimensionality::<D>()
        .map_err(|_| IoError::DimensionMismatch {
            name: format!("{name} rank"),
            expected: D::NDIM.unwrap_or(0),
            got,
        })
}

/// Read a day-of-year climatology.
///
/// The variable must have latitude, longitude and one leading day-of-year
/// axis (of any name) whose day-of-year labels, when present, run from 1.
/// Longitudes from 180 up are remapped to the -180..180 convention.
///
/// # Errors
///
/// Returns [`IoError`] if the file or variable is missing, the axis
/// layout is wrong, or the day labels do not read `1..=n`.
pub fn read_climatology(
    path: &Path,
    var_name: &str,
    name: &'static str,
) -> Result<ClimatologyReference, IoError> {
    let file = netcdf_read::open_file(path)?;
    let coords = reference_coords(&file, path)?;
    let array = netcdf_read::read_array(&file, var_name, path)?;
    if array.values.ndim() != 3 {
        return Err(IoError::DimensionMismatch {
            name: format!("{var_name} rank"),
            expected: 3,
            got: array.values.ndim(),
        });
    }
    let y = array.require_axis(LAT_ALIASES, path)?;
    let x = array.require_axis(LON_ALIASES, path)?;
    let d = (0..3).find(|&a| a != y && a != x).unwrap_or(0);
    check_day_labels(&file, &array.dims[d], array.values.len_of(Axis(d)))?;
    let values: Array3<f64> = dimensionality::<Ix3>(array.permuted(&[d, y, x]), var_name)?;
    info!(path = %path.display(), days = values.len_of(Axis(0)), "climatology loaded");
    Ok(ClimatologyReference::new(name, coords, values)?)
}

/// Read gamma parameters with dimensions `interval`, `dayofyear`,
/// `dparams` (`a`, `loc`, `scale`), latitude and longitude in any order.
///
/// # Errors
///
/// Returns [`IoError`] if the file, variable or a dimension is missing,
/// `dparams` does not have three entries, or a coordinate value is not a
/// valid interval or day-of-year.
pub fn read_gamma_parameters(path: &Path) -> Result<GammaParameterSet, IoError> {
    let file = netcdf_read::open_file(path)?;
    let coords = reference_coords(&file, path)?;
    let array = netcdf_read::read_array(&file, PARAMS_VAR, path)?;
    if array.values.ndim() != 5 {
        return Err(IoError::DimensionMismatch {
            name: format!("{PARAMS_VAR} rank"),
            expected: 5,
            got: array.values.ndim(),
        });
    }
    let i = array.require_axis(&["interval"], path)?;
    let d = array.require_axis(&["dayofyear"], path)?;
    let p = array.require_axis(&["dparams"], path)?;
    let y = array.require_axis(LAT_ALIASES, path)?;
    let x = array.require_axis(LON_ALIASES, path)?;
    let n_dparams = array.values.len_of(Axis(p));
    if n_dparams != N_DPARAMS {
        return Err(IoError::DimensionMismatch {
            name: "dparams".to_string(),
            expected: N_DPARAMS,
            got: n_dparams,
        });
    }

    let intervals = netcdf_read::read_1d_f64(&file, &["interval"], path)?;
    let doys = netcdf_read::read_1d_f64(&file, &["dayofyear"], path)?
        .into_iter()
        .map(|v| {
            let v = whole_number("dayofyear", v)?;
            Doy::new(v as u16).map_err(|e| IoError::InvalidCoordinate {
                name: "dayofyear".to_string(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // [interval, dayofyear, dparams, lat, lon]
    let values = array.permuted(&[i, d, p, y, x]);
    let mut set = GammaParameterSet::new(coords);
    for (idx, &interval) in intervals.iter().enumerate() {
        let interval = whole_number("interval", interval)?;
        if interval < 1.0 || interval > f64::from(u32::MAX) {
            return Err(IoError::InvalidCoordinate {
                name: "interval".to_string(),
                reason: format!("{interval} is not a day count"),
            });
        }
        let per_interval = values.index_axis(Axis(0), idx);
        let param = |k: usize| -> Result<Array3<f64>, IoError> {
            dimensionality::<Ix3>(per_interval.index_axis(Axis(1), k).to_owned(), PARAMS_VAR)
        };
        let grid = ParameterGrid::new(doys.clone(), param(0)?, param(1)?, param(2)?)?;
        set.insert(interval as u32, grid)?;
    }
    info!(path = %path.display(), intervals = intervals.len(), doys = doys.len(), "gamma parameters loaded");
    Ok(set)
}

/// Read the land-sea fraction and threshold it into a [`LandMask`].
///
/// A leading time axis, if present, contributes its first step.
///
/// # Errors
///
/// Returns [`IoError`] if the file, variable or axes are missing.
pub fn read_land_mask(path: &Path, threshold: f64) -> Result<LandMask, IoError> {
    let file = netcdf_read::open_file(path)?;
    let coords = reference_coords(&file, path)?;
    let array = netcdf_read::read_array(&file, LSM_VAR, path)?;
    let y = array.require_axis(LAT_ALIASES, path)?;
    let x = array.require_axis(LON_ALIASES, path)?;
    let fraction: Array2<f64> = match array.values.ndim() {
        2 => dimensionality::<Ix2>(array.permuted(&[y, x]), LSM_VAR)?,
        3 => {
            let t = (0..3).find(|&a| a != y && a != x).unwrap_or(0);
            let stacked = array.permuted(&[t, y, x]);
            dimensionality::<Ix2>(stacked.index_axis(Axis(0), 0).to_owned(), LSM_VAR)?
        }
        got => {
            return Err(IoError::DimensionMismatch {
                name: format!("{LSM_VAR} rank"),
                expected: 2,
                got,
            });
        }
    };
    let mask = LandMask::from_fraction(coords, &fraction, threshold)?;
    info!(path = %path.display(), land = mask.n_land(), threshold, "land mask loaded");
    Ok(mask)
}
