//! # drought-io
//!
//! NetCDF boundary of the drought pipeline.
//!
//! | Module | Reads / writes |
//! |---|---|
//! | `fragment` | raw reanalysis fragments, including split `expver` tracks |
//! | `reference` | day-of-year climatologies, gamma parameters, land-sea mask |
//! | `writer` | per-interval index files and the assembled daily inputs |
//!
//! Readers unpack `scale_factor` / `add_offset`, turn `_FillValue` and
//! `missing_value` into NaN, and accept `latitude`/`lat`,
//! `longitude`/`lon` and `time`/`valid_time` axis names. Reference grids
//! have their longitudes remapped from 0..360 to -180..180.

mod error;
mod fragment;
mod netcdf_read;
mod reference;
mod writer;

pub use error::IoError;
pub use fragment::{fragment_path, read_fragment, read_fragment_set};
pub use reference::{LSM_VAR, PARAMS_VAR, read_climatology, read_gamma_parameters, read_land_mask};
pub use writer::{CALIBRATION_PERIOD, write_daily_inputs, write_dataset, write_outputs};
