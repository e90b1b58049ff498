//! # drought-indices
//!
//! Drought indices over trailing intervals, from assembled daily series
//! and precomputed references.
//!
//! ```text
//! DailyInputs + References + IndexSettings
//!        │
//!        ▼  processors (tp, pntp, swe, pnswe, spi, spei, smd)
//!   IndexResults keyed by (index, interval)
//!        │
//!        ▼  postprocess: 1-day placeholders, land mask, rounding
//!        │
//!        ▼  assemble_outputs: one dataset per interval, latitude decreasing
//!   Vec<OutputDataset>
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `kind` | Index identities and intervals |
//! | `climatology` | Day-of-year references and windowed aggregation |
//! | `context` | Inputs, references and settings shared by processors |
//! | `results` | Write-once results keyed by (index, interval) |
//! | `processors` | The `IndexProcessor` trait and one processor per index |
//! | `postprocess` | Placeholders, land masking and rounding |
//! | `output` | Per-interval output datasets |
//! | `error` | Error types |

mod climatology;
mod context;
mod error;
mod kind;
mod output;
mod postprocess;
mod processors;
mod results;

pub use climatology::{Aggregation, ClimatologyReference};
pub use context::{DEFAULT_INTERVALS, DailyInputs, IndexContext, IndexSettings, References};
pub use error::IndexError;
pub use kind::{IndexKind, Interval};
pub use output::{OutputDataset, assemble_outputs};
pub use postprocess::{OUTPUT_DECIMALS, postprocess};
pub use processors::{
    IndexProcessor, PrecipitationPercentOfNormal, SnowPercentOfNormal, SnowWaterEquivalent,
    SoilMoistureDeficit, Standardized, TotalPrecipitation, default_processors,
};
pub use results::IndexResults;

use drought_grid::LandMask;
use tracing::{info, info_span};

/// Run every processor, post-process, and split the results per interval.
///
/// # Errors
///
/// Returns the first error raised by a processor, by post-processing or by
/// output assembly.
pub fn compute_indices(
    ctx: &IndexContext<'_>,
    mask: &LandMask,
) -> Result<Vec<OutputDataset>, IndexError> {
    let mut results = IndexResults::new();
    for processor in default_processors() {
        let _span = info_span!("index", name = %processor.index()).entered();
        processor.run(ctx, &mut results)?;
        info!("index computed");
    }

    let coords = ctx.inputs().coords();
    postprocess(&mut results, coords, mask)?;
    let intervals = ctx.settings().intervals()?;
    let datasets = assemble_outputs(results, coords, &intervals, ctx.analysis_date())?;
    info!(
        datasets = datasets.len(),
        reference_date = %ctx.analysis_date(),
        "indices assembled"
    );
    Ok(datasets)
}
