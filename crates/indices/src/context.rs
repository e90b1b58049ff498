//! Inputs, references and settings shared by every processor.

use chrono::NaiveDate;
use drought_calendar::{Doy, DoyWindow};
use drought_grid::{DailySeries, GridCoords};
use drought_standardize::GammaParameterSet;
use ndarray::ArrayView3;

use crate::climatology::ClimatologyReference;
use crate::error::IndexError;
use crate::kind::Interval;

/// Default trailing intervals in days.
pub const DEFAULT_INTERVALS: [u32; 6] = [7, 30, 60, 90, 180, 365];

// ---------------------------------------------------------------------------
// DailyInputs
// ---------------------------------------------------------------------------

/// The assembled daily series, all on one grid and one date range.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyInputs {
    precipitation: DailySeries,
    snow_depth: DailySeries,
    potential_evaporation: DailySeries,
    soil_moisture: DailySeries,
}

impl DailyInputs {
    /// Bundle the assembled series.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Grid`] if the grids differ, or
    /// [`IndexError::SeriesNotAligned`] if the series are empty or do not
    /// share their dates.
    pub fn new(
        precipitation: DailySeries,
        snow_depth: DailySeries,
        potential_evaporation: DailySeries,
        soil_moisture: DailySeries,
    ) -> Result<Self, IndexError> {
        if precipitation.is_empty() {
            return Err(IndexError::SeriesNotAligned {
                what: "tp",
                last: None,
            });
        }
        for (what, other) in [
            ("sd", &snow_depth),
            ("pev", &potential_evaporation),
            ("swvl", &soil_moisture),
        ] {
            precipitation
                .coords()
                .ensure_compatible(other.coords(), &format!("{what} daily series"))?;
            if other.dates() != precipitation.dates() {
                return Err(IndexError::SeriesNotAligned {
                    what,
                    last: other.last_date(),
                });
            }
        }
        Ok(Self {
            precipitation,
            snow_depth,
            potential_evaporation,
            soil_moisture,
        })
    }

    /// Daily precipitation sums (m).
    pub fn precipitation(&self) -> &DailySeries {
        &self.precipitation
    }

    /// Daily mean snow depth (m of water equivalent).
    pub fn snow_depth(&self) -> &DailySeries {
        &self.snow_depth
    }

    /// Daily potential evaporation sums (m).
    pub fn potential_evaporation(&self) -> &DailySeries {
        &self.potential_evaporation
    }

    /// Daily mean soil-moisture composite.
    pub fn soil_moisture(&self) -> &DailySeries {
        &self.soil_moisture
    }

    /// Shared grid axes.
    pub fn coords(&self) -> &GridCoords {
        self.precipitation.coords()
    }

    /// Most recent day, which is the analysis date.
    pub fn analysis_date(&self) -> Option<NaiveDate> {
        self.precipitation.last_date()
    }
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

/// Precomputed climatologies and gamma parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct References {
    /// Daily precipitation normals, summed over windows.
    pub tp_climatology: ClimatologyReference,
    /// Daily snow-water-equivalent normals, averaged over windows.
    pub swe_climatology: ClimatologyReference,
    /// Daily soil-moisture normals, averaged over windows.
    pub smd_climatology: ClimatologyReference,
    /// Gamma parameters for precipitation.
    pub spi_params: GammaParameterSet,
    /// Gamma parameters for the water budget.
    pub spei_params: GammaParameterSet,
}

impl References {
    /// Check every reference is on `coords`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Grid`] naming the first incompatible reference.
    pub fn ensure_compatible(&self, coords: &GridCoords) -> Result<(), IndexError> {
        for clim in [
            &self.tp_climatology,
            &self.swe_climatology,
            &self.smd_climatology,
        ] {
            coords.ensure_compatible(clim.coords(), &format!("{} climatology", clim.name()))?;
        }
        coords.ensure_compatible(self.spi_params.coords(), "spi gamma parameters")?;
        coords.ensure_compatible(self.spei_params.coords(), "spei gamma parameters")?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// IndexSettings
// ---------------------------------------------------------------------------

/// Tunable processing settings.
///
/// # Example
///
/// ```
/// use drought_indices::IndexSettings;
///
/// let settings = IndexSettings::new()
///     .with_intervals(vec![30, 90])
///     .with_smoothing_sigma(1.5);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSettings {
    intervals: Vec<u32>,
    smoothing_sigma: f64,
    spei_offset: f64,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexSettings {
    /// Defaults: intervals `[7, 30, 60, 90, 180, 365]`,
    /// `smoothing_sigma = 2.0`, `spei_offset = 0.001`.
    pub fn new() -> Self {
        Self {
            intervals: DEFAULT_INTERVALS.to_vec(),
            smoothing_sigma: 2.0,
            spei_offset: 0.001,
        }
    }

    /// Sets the trailing intervals in days.
    pub fn with_intervals(mut self, days: Vec<u32>) -> Self {
        self.intervals = days;
        self
    }

    /// Sets the Gaussian smoothing sigma in days.
    pub fn with_smoothing_sigma(mut self, sigma: f64) -> Self {
        self.smoothing_sigma = sigma;
        self
    }

    /// Sets the offset added to the SPEI water budget (m).
    pub fn with_spei_offset(mut self, offset: f64) -> Self {
        self.spei_offset = offset;
        self
    }

    /// Gaussian smoothing sigma in days.
    pub fn smoothing_sigma(&self) -> f64 {
        self.smoothing_sigma
    }

    /// Offset added to the SPEI water budget (m).
    pub fn spei_offset(&self) -> f64 {
        self.spei_offset
    }

    /// The configured intervals, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidInterval`] for a length outside
    /// 1..=365.
    pub fn intervals(&self) -> Result<Vec<Interval>, IndexError> {
        let mut intervals = self
            .intervals
            .iter()
            .map(|&d| Interval::new(d))
            .collect::<Result<Vec<_>, _>>()?;
        intervals.sort();
        Ok(intervals)
    }

    /// Validates this configuration.
    ///
    /// Intervals must be non-empty, unique and within 2..=365; the 1-day
    /// interval is always produced and may not be configured. The sigma
    /// must be finite and positive, the offset finite.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidSetting`] describing the first problem.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.intervals.is_empty() {
            return Err(IndexError::InvalidSetting {
                reason: "at least one interval is required".to_string(),
            });
        }
        let mut seen = self.intervals.clone();
        seen.sort_unstable();
        if let Some(w) = seen.windows(2).find(|w| w[0] == w[1]) {
            return Err(IndexError::InvalidSetting {
                reason: format!("interval {} is listed twice", w[0]),
            });
        }
        if let Some(&d) = seen.iter().find(|&&d| !(2..=Interval::MAX_DAYS).contains(&d)) {
            return Err(IndexError::InvalidSetting {
                reason: format!("interval {d} must be within 2..=365"),
            });
        }
        if !self.smoothing_sigma.is_finite() || self.smoothing_sigma <= 0.0 {
            return Err(IndexError::InvalidSetting {
                reason: format!(
                    "smoothing_sigma must be finite and > 0, got {}",
                    self.smoothing_sigma
                ),
            });
        }
        if !self.spei_offset.is_finite() {
            return Err(IndexError::InvalidSetting {
                reason: format!("spei_offset must be finite, got {}", self.spei_offset),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// IndexContext
// ---------------------------------------------------------------------------

/// Everything a processor reads, validated as one unit.
#[derive(Debug, Clone, Copy)]
pub struct IndexContext<'a> {
    inputs: &'a DailyInputs,
    references: &'a References,
    settings: &'a IndexSettings,
    analysis_date: NaiveDate,
}

impl<'a> IndexContext<'a> {
    /// Bind inputs, references and settings.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidSetting`] for bad settings,
    /// [`IndexError::SeriesNotAligned`] for empty inputs, or
    /// [`IndexError::Grid`] if a reference is on another grid.
    pub fn new(
        inputs: &'a DailyInputs,
        references: &'a References,
        settings: &'a IndexSettings,
    ) -> Result<Self, IndexError> {
        settings.validate()?;
        references.ensure_compatible(inputs.coords())?;
        let analysis_date = inputs.analysis_date().ok_or(IndexError::SeriesNotAligned {
            what: "tp",
            last: None,
        })?;
        Ok(Self {
            inputs,
            references,
            settings,
            analysis_date,
        })
    }

    /// The assembled daily series.
    pub fn inputs(&self) -> &'a DailyInputs {
        self.inputs
    }

    /// Climatologies and gamma parameters.
    pub fn references(&self) -> &'a References {
        self.references
    }

    /// Processing settings.
    pub fn settings(&self) -> &'a IndexSettings {
        self.settings
    }

    /// Last day of every series.
    pub fn analysis_date(&self) -> NaiveDate {
        self.analysis_date
    }

    /// Day-of-year of the analysis date.
    pub fn analysis_doy(&self) -> Doy {
        Doy::of(self.analysis_date)
    }

    /// Day-of-year window of the `interval` days ending on the analysis
    /// date.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Calendar`] if the window cannot be formed.
    pub fn doy_window(&self, interval: Interval) -> Result<DoyWindow, IndexError> {
        Ok(DoyWindow::trailing(self.analysis_date, interval.days())?)
    }

    /// The most recent `interval` days of `series`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::SeriesTooShort`] if the series is shorter.
    pub fn trailing(
        &self,
        what: &'static str,
        series: &'a DailySeries,
        interval: Interval,
    ) -> Result<ArrayView3<'a, f64>, IndexError> {
        series
            .trailing(interval.days() as usize)
            .map_err(|_| IndexError::SeriesTooShort {
                what,
                interval,
                len: series.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = IndexSettings::new();
        settings.validate().unwrap();
        let days: Vec<u32> = settings.intervals().unwrap().iter().map(|i| i.days()).collect();
        assert_eq!(days, DEFAULT_INTERVALS.to_vec());
    }

    #[test]
    fn invalid_settings() {
        assert!(IndexSettings::new().with_intervals(vec![]).validate().is_err());
        assert!(IndexSettings::new().with_intervals(vec![30, 30]).validate().is_err());
        assert!(IndexSettings::new().with_intervals(vec![1, 30]).validate().is_err());
        assert!(IndexSettings::new().with_intervals(vec![400]).validate().is_err());
        assert!(IndexSettings::new().with_smoothing_sigma(0.0).validate().is_err());
        assert!(
            IndexSettings::new()
                .with_spei_offset(f64::NAN)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn intervals_are_sorted() {
        let settings = IndexSettings::new().with_intervals(vec![90, 7, 30]);
        let days: Vec<u32> = settings.intervals().unwrap().iter().map(|i| i.days()).collect();
        assert_eq!(days, vec![7, 30, 90]);
    }
}
