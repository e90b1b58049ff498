use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, NaiveDate};
use tracing::{info, info_span};

use drought_assemble::{RawVariable, assemble_soil_moisture, assemble_variable};
use drought_grid::LandMask;
use drought_indices::{DailyInputs, IndexContext, References, compute_indices};
use drought_io::{
    read_climatology, read_fragment_set, read_gamma_parameters, read_land_mask,
    write_daily_inputs, write_outputs,
};

use crate::cli::ProcessArgs;
use crate::config::{DroughtConfig, FilesToml};
use crate::convert;

/// Load and parse the TOML configuration.
fn load_config(path: &Path) -> Result<DroughtConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config: {}", path.display()))
}

/// Run the full pipeline: assemble, load references, compute, write.
pub fn run(args: ProcessArgs) -> Result<()> {
    let started = Instant::now();
    let config = load_config(&args.config)?;

    // Step 1: Resolve paths and settings
    let input_dir = config
        .paths
        .input_dir
        .as_deref()
        .ok_or_else(|| anyhow!("no input directory: set [paths].input_dir in config"))?;
    let climatology_dir = config.paths.climatology_dir.as_deref().ok_or_else(|| {
        anyhow!("no climatology directory: set [paths].climatology_dir in config")
    })?;
    let output_dir = args
        .output
        .as_deref()
        .or(config.paths.output_dir.as_deref())
        .ok_or_else(|| {
            anyhow!("no output directory: set [paths].output_dir in config or use --output")
        })?;

    let date = convert::resolve_analysis_date(&config.run, args.date, Local::now().date_naive())?;
    let settings = convert::build_index_settings(&config.run, &config.processing)?;
    let threshold = convert::land_threshold(&config.processing)?;
    let domain = convert::build_bounding_box(&config.domain)?;
    info!(analysis_date = %date, input = %input_dir.display(), "starting drought run");

    // Step 2: Assemble the trailing year of daily inputs
    let inputs = {
        let _span = info_span!("assemble", analysis_date = %date).entered();
        assemble_inputs(input_dir, date)?
    };
    if !domain.contains(inputs.coords()) {
        bail!(
            "assembled grid (latitudes {:?}, longitudes {:?}) lies outside the configured domain {:?}",
            bounds(inputs.coords().lats()),
            bounds(inputs.coords().lons()),
            config.domain.area
        );
    }
    if let Some(path) = config.paths.daily_inputs.as_deref() {
        write_daily_inputs(path, &inputs)
            .with_context(|| format!("failed to write daily inputs: {}", path.display()))?;
    }

    // Step 3: Load references
    let (references, mask) = {
        let _span = info_span!("references", dir = %climatology_dir.display()).entered();
        load_references(climatology_dir, &config.files, threshold)?
    };
    inputs
        .coords()
        .ensure_compatible(mask.coords(), "land-sea mask")
        .context("land-sea mask is not on the input grid")?;

    // Step 4: Compute every index
    let datasets = {
        let _span = info_span!("indices").entered();
        let ctx = IndexContext::new(&inputs, &references, &settings)
            .context("inputs and references are inconsistent")?;
        compute_indices(&ctx, &mask).context("index computation failed")?
    };

    // Step 5: Write one file per interval
    let paths = {
        let _span = info_span!("write", dir = %output_dir.display()).entered();
        write_outputs(output_dir, &datasets)
            .with_context(|| format!("failed to write outputs to {}", output_dir.display()))?
    };

    info!(
        files = paths.len(),
        elapsed_minutes = started.elapsed().as_secs_f64() / 60.0,
        "drought run complete"
    );
    Ok(())
}

/// Read and assemble every raw variable for `date`.
fn assemble_inputs(input_dir: &Path, date: NaiveDate) -> Result<DailyInputs> {
    let fragments = |variable: RawVariable| {
        read_fragment_set(input_dir, variable).with_context(|| {
            format!(
                "failed to read {variable} fragments from {}",
                input_dir.display()
            )
        })
    };
    let single = |variable: RawVariable| -> Result<_> {
        assemble_variable(variable, fragments(variable)?, date)
            .with_context(|| format!("failed to assemble {variable}"))
    };

    let precipitation = single(RawVariable::TotalPrecipitation)?;
    let snow_depth = single(RawVariable::SnowDepth)?;
    let potential_evaporation = single(RawVariable::PotentialEvaporation)?;
    let soil_moisture = assemble_soil_moisture(
        fragments(RawVariable::SoilWaterLayer1)?,
        fragments(RawVariable::SoilWaterLayer2)?,
        date,
    )
    .context("failed to assemble soil moisture")?;

    DailyInputs::new(precipitation, snow_depth, potential_evaporation, soil_moisture)
        .context("assembled daily series do not line up")
}

/// Read climatologies, gamma parameters and the land-sea mask.
fn load_references(
    dir: &Path,
    files: &FilesToml,
    land_threshold: f64,
) -> Result<(References, LandMask)> {
    let clim = |file: &str, var: &str, name: &'static str| {
        let path = dir.join(file);
        read_climatology(&path, var, name)
            .with_context(|| format!("failed to read {name} climatology: {}", path.display()))
    };
    let params = |file: &str| {
        let path = dir.join(file);
        read_gamma_parameters(&path)
            .with_context(|| format!("failed to read gamma parameters: {}", path.display()))
    };

    let references = References {
        tp_climatology: clim(&files.tp_climatology, "tp", "tp")?,
        swe_climatology: clim(&files.swe_climatology, "swe", "swe")?,
        smd_climatology: clim(&files.smd_climatology, "swvl", "soil moisture")?,
        spi_params: params(&files.spi_parameters)?,
        spei_params: params(&files.spei_parameters)?,
    };

    let mask_path = dir.join(&files.land_sea_mask);
    let mask = read_land_mask(&mask_path, land_threshold)
        .with_context(|| format!("failed to read land-sea mask: {}", mask_path.display()))?;
    Ok((references, mask))
}

/// `(min, max)` of a coordinate axis.
fn bounds(axis: &[f64]) -> (f64, f64) {
    axis.iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
