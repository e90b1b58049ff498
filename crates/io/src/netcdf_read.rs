//! Low-level NetCDF extraction helpers.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use drought_grid::GridCoords;
use ndarray::{ArrayD, IxDyn};
use netcdf::AttributeValue;

use crate::error::IoError;

/// Aliases tried for the latitude axis.
pub(crate) const LAT_ALIASES: &[&str] = &["latitude", "lat"];
/// Aliases tried for the longitude axis.
pub(crate) const LON_ALIASES: &[&str] = &["longitude", "lon"];
/// Aliases tried for the time axis.
pub(crate) const TIME_ALIASES: &[&str] = &["time", "valid_time"];

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Read a 1-D `f64` variable, trying each alias in order.
///
/// Returns the data from the first alias that matches. If none match,
/// returns [`IoError::MissingVariable`] with the first alias as the name.
pub(crate) fn read_1d_f64(
    file: &netcdf::File,
    aliases: &[&str],
    path: &Path,
) -> Result<Vec<f64>, IoError> {
    for &alias in aliases {
        if let Some(var) = file.variable(alias) {
            return Ok(var.get_values::<f64, _>(..)?);
        }
    }

    let name = aliases.first().copied().unwrap_or("unknown");
    Err(IoError::MissingVariable {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// Read the latitude and longitude axes.
pub(crate) fn read_coords(file: &netcdf::File, path: &Path) -> Result<GridCoords, IoError> {
    let lats = read_1d_f64(file, LAT_ALIASES, path)?;
    let lons = read_1d_f64(file, LON_ALIASES, path)?;
    Ok(GridCoords::new(lats, lons)?)
}

/// Numeric value of a scalar (or first element of a vector) attribute.
pub(crate) fn attr_f64(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
    let value = var.attribute_value(name)?.ok()?;
    match value {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Short(v) => Some(f64::from(v)),
        AttributeValue::Ushort(v) => Some(f64::from(v)),
        AttributeValue::Int(v) => Some(f64::from(v)),
        AttributeValue::Uint(v) => Some(f64::from(v)),
        AttributeValue::Schar(v) => Some(f64::from(v)),
        AttributeValue::Uchar(v) => Some(f64::from(v)),
        AttributeValue::Longlong(v) => Some(v as f64),
        AttributeValue::Ulonglong(v) => Some(v as f64),
        AttributeValue::Doubles(v) => v.first().copied(),
        AttributeValue::Floats(v) => v.first().map(|&x| f64::from(x)),
        AttributeValue::Shorts(v) => v.first().map(|&x| f64::from(x)),
        AttributeValue::Ints(v) => v.first().map(|&x| f64::from(x)),
        _ => None,
    }
}

/// String value of an attribute.
pub(crate) fn attr_string(var: &netcdf::Variable<'_>, name: &str) -> Option<String> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

/// CF packing and missing-value attributes of a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Packing {
    pub(crate) scale_factor: f64,
    pub(crate) add_offset: f64,
    pub(crate) fill_value: Option<f64>,
    pub(crate) missing_value: Option<f64>,
}

impl Packing {
    pub(crate) fn of(var: &netcdf::Variable<'_>) -> Self {
        Self {
            scale_factor: attr_f64(var, "scale_factor").unwrap_or(1.0),
            add_offset: attr_f64(var, "add_offset").unwrap_or(0.0),
            fill_value: attr_f64(var, "_FillValue"),
            missing_value: attr_f64(var, "missing_value"),
        }
    }

    /// Raw stored value to physical value; fill and missing values become
    /// NaN.
    pub(crate) fn unpack(&self, raw: f64) -> f64 {
        if raw.is_nan()
            || self.fill_value.is_some_and(|f| raw == f)
            || self.missing_value.is_some_and(|m| raw == m)
        {
            return f64::NAN;
        }
        raw * self.scale_factor + self.add_offset
    }
}

/// An unpacked N-D variable together with its dimension names.
#[derive(Debug, Clone)]
pub(crate) struct NamedArray {
    pub(crate) name: String,
    pub(crate) dims: Vec<String>,
    pub(crate) values: ArrayD<f64>,
}

impl NamedArray {
    /// Position of the first dimension matching any alias.
    pub(crate) fn axis(&self, aliases: &[&str]) -> Option<usize> {
        self.dims.iter().position(|d| aliases.contains(&d.as_str()))
    }

    /// Position of a dimension, or [`IoError::MissingDimension`].
    pub(crate) fn require_axis(&self, aliases: &[&str], path: &Path) -> Result<usize, IoError> {
        self.axis(aliases).ok_or_else(|| IoError::MissingDimension {
            name: aliases.first().copied().unwrap_or("unknown").to_string(),
            variable: self.name.clone(),
            path: path.to_path_buf(),
        })
    }

    /// Reorder the axes to `order`, which must name every axis once.
    pub(crate) fn permuted(self, order: &[usize]) -> ArrayD<f64> {
        self.values
            .permuted_axes(order)
            .as_standard_layout()
            .into_owned()
    }
}

/// Read and unpack a variable of any rank.
pub(crate) fn read_array(
    file: &netcdf::File,
    var_name: &str,
    path: &Path,
) -> Result<NamedArray, IoError> {
    let var = file
        .variable(var_name)
        .ok_or_else(|| IoError::MissingVariable {
            name: var_name.to_string(),
            path: path.to_path_buf(),
        })?;

    let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let packing = Packing::of(&var);
    let raw = var.get_values::<f64, _>(..)?;
    let data: Vec<f64> = raw.into_iter().map(|v| packing.unpack(v)).collect();

    let values = ArrayD::from_shape_vec(IxDyn(&shape), data).map_err(|e| IoError::Netcdf {
        reason: format!("'{var_name}' values do not match its dimensions: {e}"),
    })?;
    Ok(NamedArray {
        name: var_name.to_string(),
        dims,
        values,
    })
}

/// Unit of a CF time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "seconds" | "second" | "s" => Some(Self::Seconds),
            "minutes" | "minute" => Some(Self::Minutes),
            "hours" | "hour" | "h" => Some(Self::Hours),
            "days" | "day" | "d" => Some(Self::Days),
            _ => None,
        }
    }

    fn seconds(self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3600.0,
            Self::Days => 86_400.0,
        }
    }
}

/// Parse a CF units string such as `"hours since 1900-01-01 00:00:00.0"`.
pub(crate) fn parse_time_units(units: &str) -> Result<(TimeUnit, NaiveDateTime), IoError> {
    let parts: Vec<&str> = units.trim().splitn(3, ' ').collect();
    if parts.len() < 3 || parts[1] != "since" {
        return Err(IoError::InvalidTime {
            reason: format!("unexpected time units format: '{units}'"),
        });
    }
    let unit = TimeUnit::parse(parts[0]).ok_or_else(|| IoError::InvalidTime {
        reason: format!("unknown unit '{}'", parts[0]),
    })?;

    let base = parts[2].trim().trim_end_matches('Z');
    let parsed = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(base, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(base, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| IoError::InvalidTime {
            reason: format!("failed to parse base date '{base}'"),
        })?;
    Ok((unit, parsed))
}

/// Read and decode the time axis as timestamps.
pub(crate) fn read_times(file: &netcdf::File, path: &Path) -> Result<Vec<NaiveDateTime>, IoError> {
    let (name, var) = TIME_ALIASES
        .iter()
        .find_map(|&n| file.variable(n).map(|v| (n, v)))
        .ok_or_else(|| IoError::MissingVariable {
            name: TIME_ALIASES[0].to_string(),
            path: path.to_path_buf(),
        })?;
    let units = attr_string(&var, "units").ok_or_else(|| IoError::InvalidTime {
        reason: format!("time variable '{name}' has no 'units' attribute"),
    })?;
    let (unit, base) = parse_time_units(&units)?;
    let offsets = var.get_values::<f64, _>(..)?;
    offsets_to_datetimes(base, unit, &offsets)
}

/// Convert offsets in `unit` from `base` into timestamps, rounded to the
/// nearest second.
pub(crate) fn offsets_to_datetimes(
    base: NaiveDateTime,
    unit: TimeUnit,
    offsets: &[f64],
) -> Result<Vec<NaiveDateTime>, IoError> {
    offsets
        .iter()
        .map(|&offset| {
            let seconds = (offset * unit.seconds()).round();
            if !seconds.is_finite() {
                return Err(IoError::InvalidTime {
                    reason: format!("non-finite time offset {offset}"),
                });
            }
            base.checked_add_signed(TimeDelta::seconds(seconds as i64))
                .ok_or_else(|| IoError::InvalidTime {
                    reason: format!("date overflow adding {offset} to {base}"),
                })
        })
        .collect()
}
