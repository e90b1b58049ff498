//! Fragment resolution, soil-moisture composition, and the trailing window.

use chrono::NaiveDate;
use drought_calendar::trailing_dates;
use drought_grid::{DailySeries, HourlySeries};
use tracing::{debug, info, warn};

use crate::error::AssembleError;
use crate::fragment::{FragmentKind, FragmentLayout, FragmentSet};
use crate::merge::merge_fragments;
use crate::resample::resample_daily;
use crate::variable::{DailyAggregation, RawVariable};

/// Length of the assembled daily window.
pub const WINDOW_DAYS: u32 = 365;

/// Weights of the two soil layers in the soil-moisture composite.
pub const SOIL_LAYER_WEIGHTS: [f64; 2] = [0.25, 0.75];

/// Label of the soil-moisture composite in errors.
const SOIL_LABEL: &str = "swvl";

/// Resolve a variable's fragments into one hourly series.
///
/// The layout follows the analysis date. A `current_year` fragment
/// delivered for a January analysis is ignored.
///
/// # Errors
///
/// Returns [`AssembleError::MissingFragment`] if the layout requires a
/// fragment that is absent, or any error from track collapse or merging.
pub fn assemble_hourly(
    variable: RawVariable,
    mut fragments: FragmentSet,
    analysis_date: NaiveDate,
) -> Result<HourlySeries, AssembleError> {
    let layout = FragmentLayout::for_analysis_date(analysis_date);
    if layout == FragmentLayout::TwoFragment && fragments.contains(FragmentKind::CurrentYear) {
        warn!(
            variable = variable.name(),
            "ignoring current_year fragment for a January analysis"
        );
        fragments.take(FragmentKind::CurrentYear);
    }

    let mut parts = Vec::with_capacity(layout.required().len());
    for &kind in layout.required() {
        let fragment = fragments
            .take(kind)
            .ok_or(AssembleError::MissingFragment {
                variable: variable.name(),
                fragment: kind,
            })?;
        if fragment.has_tracks() {
            debug!(variable = variable.name(), fragment = %kind, "collapsing expver tracks");
        }
        parts.push(fragment.into_hourly(variable)?);
    }
    merge_fragments(variable.name(), &parts)
}

/// Restrict a daily series to the [`WINDOW_DAYS`] days ending on
/// `analysis_date`.
///
/// # Errors
///
/// Returns [`AssembleError::WindowNotCovered`] if the series does not reach
/// either end of the window, or [`AssembleError::WindowGap`] if a day inside
/// it is missing.
pub fn trailing_window(
    variable: &'static str,
    daily: &DailySeries,
    analysis_date: NaiveDate,
) -> Result<DailySeries, AssembleError> {
    let wanted = trailing_dates(analysis_date, WINDOW_DAYS)?;
    let not_covered = || AssembleError::WindowNotCovered {
        variable,
        first: daily.dates().first().copied(),
        last: daily.last_date(),
        start: wanted[0],
        end: analysis_date,
    };

    let start = daily
        .dates()
        .binary_search(&wanted[0])
        .map_err(|_| not_covered())?;
    let end = daily
        .dates()
        .binary_search(&analysis_date)
        .map_err(|_| not_covered())?;

    let window = daily.select(start..end + 1);
    if let Some(i) = window.first_gap() {
        return Err(AssembleError::WindowGap {
            variable,
            after: window.dates()[i - 1],
        });
    }
    Ok(window)
}

/// Assemble one raw variable into its trailing daily window.
///
/// # Errors
///
/// Propagates any fragment, merge, resampling, or window error.
pub fn assemble_variable(
    variable: RawVariable,
    fragments: FragmentSet,
    analysis_date: NaiveDate,
) -> Result<DailySeries, AssembleError> {
    let hourly = assemble_hourly(variable, fragments, analysis_date)?;
    let daily = resample_daily(&hourly, variable.aggregation())?;
    let window = trailing_window(variable.name(), &daily, analysis_date)?;
    info!(
        variable = variable.name(),
        hours = hourly.len(),
        days = window.len(),
        "variable assembled"
    );
    Ok(window)
}

/// Assemble the soil-moisture composite from the two soil layers.
///
/// The layers are weighted hour by hour and the composite is averaged to
/// daily values.
///
/// # Errors
///
/// Propagates any fragment, merge, or window error, and returns
/// [`AssembleError::Grid`] if the two layers are not on identical axes.
pub fn assemble_soil_moisture(
    layer1: FragmentSet,
    layer2: FragmentSet,
    analysis_date: NaiveDate,
) -> Result<DailySeries, AssembleError> {
    let upper = assemble_hourly(RawVariable::SoilWaterLayer1, layer1, analysis_date)?;
    let lower = assemble_hourly(RawVariable::SoilWaterLayer2, layer2, analysis_date)?;
    let [w1, w2] = SOIL_LAYER_WEIGHTS;
    let composite = upper.combine(&lower, |a, b| w1 * a + w2 * b)?;
    let daily = resample_daily(&composite, DailyAggregation::Mean)?;
    let window = trailing_window(SOIL_LABEL, &daily, analysis_date)?;
    info!(variable = SOIL_LABEL, days = window.len(), "soil moisture assembled");
    Ok(window)
}
