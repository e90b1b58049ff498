//! NetCDF writers for index outputs and assembled daily inputs.

use std::path::{Path, PathBuf};

use drought_grid::{DailySeries, GridCoords};
use drought_indices::{DailyInputs, OutputDataset};
use tracing::{debug, info};

use crate::error::IoError;

/// Calibration period of the gamma parameters behind `spi` and `spei`.
pub const CALIBRATION_PERIOD: &str = "1981-2020";

fn add_coordinate_axes(file: &mut netcdf::FileMut, coords: &GridCoords) -> Result<(), IoError> {
    let (ny, nx) = coords.shape();
    file.add_dimension("latitude", ny)?;
    file.add_dimension("longitude", nx)?;

    {
        let mut lat = file.add_variable::<f64>("latitude", &["latitude"])?;
        lat.put_attribute("units", "degrees_north")?;
        lat.put_attribute("long_name", "latitude")?;
        lat.put_values(coords.lats(), ..)?;
    }
    {
        let mut lon = file.add_variable::<f64>("longitude", &["longitude"])?;
        lon.put_attribute("units", "degrees_east")?;
        lon.put_attribute("long_name", "longitude")?;
        lon.put_values(coords.lons(), ..)?;
    }
    Ok(())
}

fn create_file(path: &Path) -> Result<netcdf::FileMut, IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| IoError::Filesystem {
            path: parent.to_path_buf(),
            reason: e.to_string(),
        })?;
    }
    Ok(netcdf::create(path)?)
}

/// Write one interval's indices to `{output_dir}/drought_indices_{n}d.nc`.
///
/// Every index becomes a `(latitude, longitude)` f64 variable with
/// `long_name`, `units` and a NaN `_FillValue`. The file carries the
/// `reference_date` and `interval_days` global attributes.
///
/// # Errors
///
/// Returns [`IoError`] if the directory or file cannot be created or a
/// NetCDF call fails.
pub fn write_dataset(output_dir: &Path, dataset: &OutputDataset) -> Result<PathBuf, IoError> {
    let path = output_dir.join(dataset.file_name());
    let mut file = create_file(&path)?;

    file.add_attribute("reference_date", dataset.reference_date().to_string())?;
    file.add_attribute("interval_days", dataset.interval().days() as i32)?;
    add_coordinate_axes(&mut file, dataset.coords())?;

    for (kind, field) in dataset.fields() {
        let mut var = file.add_variable::<f64>(kind.name(), &["latitude", "longitude"])?;
        var.put_attribute("_FillValue", f64::NAN)?;
        var.put_attribute("long_name", kind.long_name())?;
        var.put_attribute("units", kind.units())?;
        if kind.is_standardized() {
            var.put_attribute("calibration_period", CALIBRATION_PERIOD)?;
        }
        let values: Vec<f64> = field.iter().copied().collect();
        var.put_values(&values, ..)?;
        debug!(index = kind.name(), interval = %dataset.interval(), "variable written");
    }

    info!(path = %path.display(), "indices written");
    Ok(path)
}

/// Write every dataset into `output_dir`, creating it if needed.
///
/// # Errors
///
/// Returns the first [`IoError`] encountered.
pub fn write_outputs(output_dir: &Path, datasets: &[OutputDataset]) -> Result<Vec<PathBuf>, IoError> {
    std::fs::create_dir_all(output_dir).map_err(|e| IoError::Filesystem {
        path: output_dir.to_path_buf(),
        reason: e.to_string(),
    })?;
    datasets
        .iter()
        .map(|dataset| write_dataset(output_dir, dataset))
        .collect()
}

/// Write the assembled daily inputs to a single file with a
/// `days since {first date}` time axis.
///
/// Variables: `tp`, `sd`, `pev` and the layer-weighted `swvl`.
///
/// # Errors
///
/// Returns [`IoError`] if the file cannot be created or a NetCDF call fails.
pub fn write_daily_inputs(path: &Path, inputs: &DailyInputs) -> Result<(), IoError> {
    let series: [(&str, &str, &DailySeries); 4] = [
        ("tp", "m", inputs.precipitation()),
        ("sd", "m of water equivalent", inputs.snow_depth()),
        ("pev", "m", inputs.potential_evaporation()),
        ("swvl", "m3 m-3", inputs.soil_moisture()),
    ];
    let dates = inputs.precipitation().dates();
    let Some(&first) = dates.first() else {
        return Err(IoError::InvalidTime {
            reason: "no daily inputs to write".to_string(),
        });
    };

    let mut file = create_file(path)?;
    file.add_dimension("time", dates.len())?;
    add_coordinate_axes(&mut file, inputs.coords())?;
    {
        let offsets: Vec<f64> = dates
            .iter()
            .map(|d| d.signed_duration_since(first).num_days() as f64)
            .collect();
        let mut time = file.add_variable::<f64>("time", &["time"])?;
        time.put_attribute("units", format!("days since {first}"))?;
        time.put_attribute("calendar", "proleptic_gregorian")?;
        time.put_values(&offsets, ..)?;
    }
    for (name, units, daily) in series {
        let mut var = file.add_variable::<f64>(name, &["time", "latitude", "longitude"])?;
        var.put_attribute("_FillValue", f64::NAN)?;
        var.put_attribute("units", units)?;
        let values: Vec<f64> = daily.values().iter().copied().collect();
        var.put_values(&values, ..)?;
    }

    info!(path = %path.display(), days = dates.len(), "daily inputs written");
    Ok(())
}

