use std::path::PathBuf;

use serde::Deserialize;

/// Top-level drought configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DroughtConfig {
    /// Input, reference and output locations.
    #[serde(default)]
    pub paths: PathsToml,

    /// Analysis date and intervals.
    #[serde(default)]
    pub run: RunToml,

    /// Numerical settings.
    #[serde(default)]
    pub processing: ProcessingToml,

    /// Reference file names inside `climatology_dir`.
    #[serde(default)]
    pub files: FilesToml,

    /// Expected geographic domain.
    #[serde(default)]
    pub domain: DomainToml,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PathsToml {
    pub input_dir: Option<PathBuf>,
    pub climatology_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    /// Where to write the assembled daily inputs, if anywhere.
    pub daily_inputs: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunToml {
    /// ISO date; today minus `lag_days` when absent.
    pub analysis_date: Option<String>,
    #[serde(default = "default_lag_days")]
    pub lag_days: u32,
    #[serde(default = "default_intervals")]
    pub intervals: Vec<u32>,
}

impl Default for RunToml {
    fn default() -> Self {
        Self {
            analysis_date: None,
            lag_days: default_lag_days(),
            intervals: default_intervals(),
        }
    }
}

fn default_lag_days() -> u32 {
    8
}
fn default_intervals() -> Vec<u32> {
    drought_indices::DEFAULT_INTERVALS.to_vec()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessingToml {
    #[serde(default = "default_smoothing_sigma")]
    pub smoothing_sigma: f64,
    #[serde(default = "default_land_threshold")]
    pub land_threshold: f64,
    #[serde(default = "default_spei_offset")]
    pub spei_offset: f64,
}

impl Default for ProcessingToml {
    fn default() -> Self {
        Self {
            smoothing_sigma: default_smoothing_sigma(),
            land_threshold: default_land_threshold(),
            spei_offset: default_spei_offset(),
        }
    }
}

fn default_smoothing_sigma() -> f64 {
    2.0
}
fn default_land_threshold() -> f64 {
    0.5
}
fn default_spei_offset() -> f64 {
    0.001
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilesToml {
    #[serde(default = "default_tp_climatology")]
    pub tp_climatology: String,
    #[serde(default = "default_swe_climatology")]
    pub swe_climatology: String,
    #[serde(default = "default_smd_climatology")]
    pub smd_climatology: String,
    #[serde(default = "default_spi_parameters")]
    pub spi_parameters: String,
    #[serde(default = "default_spei_parameters")]
    pub spei_parameters: String,
    #[serde(default = "default_land_sea_mask")]
    pub land_sea_mask: String,
}

impl Default for FilesToml {
    fn default() -> Self {
        Self {
            tp_climatology: default_tp_climatology(),
            swe_climatology: default_swe_climatology(),
            smd_climatology: default_smd_climatology(),
            spi_parameters: default_spi_parameters(),
            spei_parameters: default_spei_parameters(),
            land_sea_mask: default_land_sea_mask(),
        }
    }
}

fn default_tp_climatology() -> String {
    "era5_daily_tp_climatology_1981_2020_leap.nc".to_string()
}
fn default_swe_climatology() -> String {
    "era5_swe_climo_81-20.nc".to_string()
}
fn default_smd_climatology() -> String {
    "era5_daily_swvl_climatology_1981_2020.nc".to_string()
}
fn default_spi_parameters() -> String {
    "spi_gamma_parameters.nc".to_string()
}
fn default_spei_parameters() -> String {
    "spei_gamma_parameters.nc".to_string()
}
fn default_land_sea_mask() -> String {
    "land_sea_mask.nc".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainToml {
    /// `[north, west, south, east]` in degrees.
    #[serde(default = "default_area")]
    pub area: [f64; 4],
}

impl Default for DomainToml {
    fn default() -> Self {
        Self {
            area: default_area(),
        }
    }
}

fn default_area() -> [f64; 4] {
    [76.0, -180.0, 44.0, -125.0]
}
