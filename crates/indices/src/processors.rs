//! One processor per index, run in a fixed order over a shared result set.

use drought_grid::{Field, nan_mean_time, nan_sum_time, smooth_time_at};
use drought_standardize::{GammaParameterSet, standardize};
use ndarray::{Array3, ArrayView3, Zip};
use tracing::debug;

use crate::climatology::Aggregation;
use crate::context::IndexContext;
use crate::error::IndexError;
use crate::kind::{IndexKind, Interval};
use crate::results::IndexResults;

/// Metres to centimetres.
const M_TO_CM: f64 = 100.0;

/// A procedure that produces one index at every interval it defines.
pub trait IndexProcessor {
    /// The index this processor writes.
    fn index(&self) -> IndexKind;

    /// Indices that must already be present at every interval this
    /// processor runs at.
    fn requires(&self) -> &'static [IndexKind] {
        &[]
    }

    /// Compute the index at one interval.
    ///
    /// # Errors
    ///
    /// Returns any error raised while reading inputs or references.
    fn compute(
        &self,
        ctx: &IndexContext<'_>,
        interval: Interval,
        results: &IndexResults,
    ) -> Result<Field, IndexError>;

    /// Intervals this processor writes: the 1-day snapshot where the index
    /// defines one, then every configured interval.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidInterval`] for a bad configured interval.
    fn intervals(&self, ctx: &IndexContext<'_>) -> Result<Vec<Interval>, IndexError> {
        let mut intervals = Vec::new();
        if self.index().defined_at_one_day() {
            intervals.push(Interval::ONE_DAY);
        }
        intervals.extend(ctx.settings().intervals()?);
        Ok(intervals)
    }

    /// Check requirements, then compute and store every interval.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::MissingRequirement`] before computing anything
    /// if a prerequisite is absent, or any error from [`compute`](Self::compute)
    /// or from storing the result.
    fn run(&self, ctx: &IndexContext<'_>, results: &mut IndexResults) -> Result<(), IndexError> {
        let intervals = self.intervals(ctx)?;
        for &interval in &intervals {
            if let Some(&requires) = self
                .requires()
                .iter()
                .find(|&&r| !results.contains(r, interval))
            {
                return Err(IndexError::MissingRequirement {
                    index: self.index(),
                    requires,
                    interval,
                });
            }
        }
        for interval in intervals {
            let field = self.compute(ctx, interval, results)?;
            debug!(index = %self.index(), %interval, "computed");
            results.insert(self.index(), interval, field)?;
        }
        Ok(())
    }
}

/// The processors for every index, in processing order.
pub fn default_processors() -> Vec<Box<dyn IndexProcessor>> {
    vec![
        Box::new(TotalPrecipitation),
        Box::new(PrecipitationPercentOfNormal),
        Box::new(SnowWaterEquivalent),
        Box::new(SnowPercentOfNormal),
        Box::new(Standardized::spi()),
        Box::new(Standardized::spei()),
        Box::new(SoilMoistureDeficit),
    ]
}

/// The most recent value of `series`, smoothed along time.
fn smoothed_latest(values: ArrayView3<'_, f64>, sigma: f64) -> Result<Field, IndexError> {
    let last = values.len_of(ndarray::Axis(0)).saturating_sub(1);
    Ok(smooth_time_at(values, last, sigma)?)
}

/// Element-wise `f(a, b)` over two equally shaped fields.
fn zip_fields(a: &Field, b: &Field, f: impl Fn(f64, f64) -> f64) -> Field {
    let mut out = Field::zeros(a.raw_dim());
    Zip::from(&mut out)
        .and(a)
        .and(b)
        .for_each(|o, &x, &y| *o = f(x, y));
    out
}

// ---------------------------------------------------------------------------
// Precipitation
// ---------------------------------------------------------------------------

/// `tp`: interval precipitation sum in centimetres.
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalPrecipitation;

impl IndexProcessor for TotalPrecipitation {
    fn index(&self) -> IndexKind {
        IndexKind::Tp
    }

    fn compute(
        &self,
        ctx: &IndexContext<'_>,
        interval: Interval,
        _results: &IndexResults,
    ) -> Result<Field, IndexError> {
        let window = ctx.trailing("tp", ctx.inputs().precipitation(), interval)?;
        Ok(nan_sum_time(window) * M_TO_CM)
    }
}

/// `pntp`: `tp` as a percentage of the summed climatology.
///
/// A non-finite ratio (zero normal) is missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecipitationPercentOfNormal;

impl IndexProcessor for PrecipitationPercentOfNormal {
    fn index(&self) -> IndexKind {
        IndexKind::Pntp
    }

    fn requires(&self) -> &'static [IndexKind] {
        &[IndexKind::Tp]
    }

    fn compute(
        &self,
        ctx: &IndexContext<'_>,
        interval: Interval,
        results: &IndexResults,
    ) -> Result<Field, IndexError> {
        let tp = results.get(IndexKind::Tp, interval)?;
        let normal = ctx
            .references()
            .tp_climatology
            .aggregate(ctx.doy_window(interval)?, Aggregation::Sum)?;
        Ok(zip_fields(tp, &normal, |tp, normal| {
            let pct = 100.0 * tp / normal;
            if pct.is_finite() { pct } else { f64::NAN }
        }))
    }
}

// ---------------------------------------------------------------------------
// Snow
// ---------------------------------------------------------------------------

/// `swe`: mean snow depth in centimetres; at 1 day the smoothed latest
/// value.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnowWaterEquivalent;

impl IndexProcessor for SnowWaterEquivalent {
    fn index(&self) -> IndexKind {
        IndexKind::Swe
    }

    fn compute(
        &self,
        ctx: &IndexContext<'_>,
        interval: Interval,
        _results: &IndexResults,
    ) -> Result<Field, IndexError> {
        let sd = ctx.inputs().snow_depth();
        let current = if interval.is_one_day() {
            smoothed_latest(sd.values().view(), ctx.settings().smoothing_sigma())?
        } else {
            nan_mean_time(ctx.trailing("sd", sd, interval)?)
        };
        Ok(current * M_TO_CM)
    }
}

/// `pnswe`: `swe` as a percentage of the mean climatology.
///
/// Where the ratio is undefined (zero normal, missing snow) the value is
/// 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnowPercentOfNormal;

impl IndexProcessor for SnowPercentOfNormal {
    fn index(&self) -> IndexKind {
        IndexKind::Pnswe
    }

    fn requires(&self) -> &'static [IndexKind] {
        &[IndexKind::Swe]
    }

    fn compute(
        &self,
        ctx: &IndexContext<'_>,
        interval: Interval,
        results: &IndexResults,
    ) -> Result<Field, IndexError> {
        let swe = results.get(IndexKind::Swe, interval)?;
        let normal = ctx
            .references()
            .swe_climatology
            .aggregate(ctx.doy_window(interval)?, Aggregation::Mean)?;
        Ok(zip_fields(swe, &normal, |swe, normal| {
            let pct = 100.0 * swe / normal;
            if normal == 0.0 || !pct.is_finite() {
                100.0
            } else {
                pct
            }
        }))
    }

    // Only the configured intervals; the 1-day swe does not get a percentage.
    fn intervals(&self, ctx: &IndexContext<'_>) -> Result<Vec<Interval>, IndexError> {
        ctx.settings().intervals()
    }
}

// ---------------------------------------------------------------------------
// Standardized indices
// ---------------------------------------------------------------------------

/// `spi` and `spei`: gamma-standardized interval mean of precipitation or
/// of the water budget `tp + pev + offset`.
#[derive(Debug, Clone, Copy)]
pub struct Standardized {
    index: IndexKind,
}

impl Standardized {
    /// Standardized Precipitation Index.
    pub fn spi() -> Self {
        Self {
            index: IndexKind::Spi,
        }
    }

    /// Standardized Precipitation-Evapotranspiration Index.
    pub fn spei() -> Self {
        Self {
            index: IndexKind::Spei,
        }
    }

    fn params<'a>(&self, ctx: &IndexContext<'a>) -> &'a GammaParameterSet {
        if self.index == IndexKind::Spei {
            &ctx.references().spei_params
        } else {
            &ctx.references().spi_params
        }
    }

    fn accumulated(&self, ctx: &IndexContext<'_>, interval: Interval) -> Result<Field, IndexError> {
        let tp = ctx.trailing("tp", ctx.inputs().precipitation(), interval)?;
        if self.index != IndexKind::Spei {
            return Ok(nan_mean_time(tp));
        }
        let pev = ctx.trailing("pev", ctx.inputs().potential_evaporation(), interval)?;
        let offset = ctx.settings().spei_offset();
        let mut budget = Array3::zeros(tp.raw_dim());
        Zip::from(&mut budget)
            .and(&tp)
            .and(&pev)
            .for_each(|b, &p, &e| *b = p + e + offset);
        Ok(nan_mean_time(budget.view()))
    }
}

impl IndexProcessor for Standardized {
    fn index(&self) -> IndexKind {
        self.index
    }

    fn compute(
        &self,
        ctx: &IndexContext<'_>,
        interval: Interval,
        _results: &IndexResults,
    ) -> Result<Field, IndexError> {
        let aggregate = self.accumulated(ctx, interval)?;
        let params = self
            .params(ctx)
            .params_for(interval.days(), ctx.analysis_doy())?;
        Ok(standardize(&aggregate, params)?)
    }
}

// ---------------------------------------------------------------------------
// Soil moisture
// ---------------------------------------------------------------------------

/// `smd`: percentage deficit of soil moisture below its mean climatology;
/// at 1 day against the smoothed latest value. A zero normal is missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoilMoistureDeficit;

impl IndexProcessor for SoilMoistureDeficit {
    fn index(&self) -> IndexKind {
        IndexKind::Smd
    }

    fn compute(
        &self,
        ctx: &IndexContext<'_>,
        interval: Interval,
        _results: &IndexResults,
    ) -> Result<Field, IndexError> {
        let soil = ctx.inputs().soil_moisture();
        let current = if interval.is_one_day() {
            smoothed_latest(soil.values().view(), ctx.settings().smoothing_sigma())?
        } else {
            nan_mean_time(ctx.trailing("swvl", soil, interval)?)
        };
        let normal = ctx
            .references()
            .smd_climatology
            .aggregate(ctx.doy_window(interval)?, Aggregation::Mean)?;
        Ok(zip_fields(&current, &normal, |current, normal| {
            if normal == 0.0 {
                f64::NAN
            } else {
                100.0 * (normal - current) / normal
            }
        }))
    }
}
