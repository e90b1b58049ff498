//! Assemble raw reanalysis fragments into one gap-free daily series per
//! variable.
//!
//! Raw data arrives per variable as up to three hourly fragments: the
//! previous calendar year, the rest of the current year, and the current
//! month. Fragments may carry two experiment-version tracks (final and
//! provisional) that must be reconciled before use.
//!
//! # Pipeline
//!
//! 1. **Layout**: January analyses use two fragments, all other months three
//! 2. **Collapse** each fragment's tracks after validating that exactly one
//!    track holds a value at every point
//! 3. **Merge** the fragments on their shared axes into one hourly series
//! 4. **Resample** to daily: sums for fluxes, means for states
//! 5. **Window** to the 365 days ending on the analysis date
//!
//! Soil moisture combines two layers (`0.25 * swvl1 + 0.75 * swvl2`) on the
//! hourly series before resampling.

mod assemble;
mod error;
mod fragment;
mod merge;
mod resample;
mod variable;

pub use assemble::{
    SOIL_LAYER_WEIGHTS, WINDOW_DAYS, assemble_hourly, assemble_soil_moisture, assemble_variable,
    trailing_window,
};
pub use error::AssembleError;
pub use fragment::{Fragment, FragmentData, FragmentKind, FragmentLayout, FragmentSet, collapse_tracks};
pub use merge::merge_fragments;
pub use resample::resample_daily;
pub use variable::{DailyAggregation, RawVariable};
