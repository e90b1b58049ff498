//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use drought_calendar::analysis_date;
use drought_grid::BoundingBox;
use drought_indices::IndexSettings;

use crate::config::*;

/// Parses an ISO `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date {s:?}, expected YYYY-MM-DD"))
}

/// Picks the analysis date: the CLI override, then `[run].analysis_date`,
/// then `today` minus `[run].lag_days`.
pub fn resolve_analysis_date(
    run: &RunToml,
    override_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<NaiveDate> {
    if let Some(date) = override_date {
        return Ok(date);
    }
    if let Some(ref s) = run.analysis_date {
        return parse_date(s);
    }
    analysis_date(today, run.lag_days)
        .with_context(|| format!("cannot lag {today} by {} days", run.lag_days))
}

/// Builds validated [`IndexSettings`] from the run and processing tables.
pub fn build_index_settings(run: &RunToml, processing: &ProcessingToml) -> Result<IndexSettings> {
    let settings = IndexSettings::new()
        .with_intervals(run.intervals.clone())
        .with_smoothing_sigma(processing.smoothing_sigma)
        .with_spei_offset(processing.spei_offset);
    settings.validate().context("invalid [run] or [processing] settings")?;
    Ok(settings)
}

/// Checks the land fraction threshold lies in `[0, 1]`.
pub fn land_threshold(processing: &ProcessingToml) -> Result<f64> {
    let t = processing.land_threshold;
    if !(0.0..=1.0).contains(&t) {
        bail!("land_threshold must be within [0, 1], got {t}");
    }
    Ok(t)
}

/// Builds the expected domain from `[domain].area`.
pub fn build_bounding_box(domain: &DomainToml) -> Result<BoundingBox> {
    let [north, west, south, east] = domain.area;
    if domain.area.iter().any(|v| !v.is_finite()) {
        bail!("domain area must be finite, got {:?}", domain.area);
    }
    if north < south {
        bail!("domain north ({north}) is below south ({south})");
    }
    if east < west {
        bail!("domain east ({east}) is west of west ({west})");
    }
    Ok(BoundingBox::from_area(domain.area))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: DroughtConfig = toml::from_str("").unwrap();
        assert_eq!(config.run.lag_days, 8);
        assert_eq!(config.run.intervals, vec![7, 30, 60, 90, 180, 365]);
        assert_eq!(config.processing.smoothing_sigma, 2.0);
        assert_eq!(config.files.spi_parameters, "spi_gamma_parameters.nc");
        assert_eq!(config.domain.area, [76.0, -180.0, 44.0, -125.0]);
        assert!(config.paths.input_dir.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = toml::from_str::<DroughtConfig>("[run]\nlag = 3\n").unwrap_err();
        assert!(err.to_string().contains("lag"), "{err}");
    }

    #[test]
    fn analysis_date_precedence() {
        let run: RunToml = toml::from_str("analysis_date = \"2024-03-10\"").unwrap();
        let today = date(2024, 6, 1);
        assert_eq!(
            resolve_analysis_date(&run, Some(date(2024, 1, 5)), today).unwrap(),
            date(2024, 1, 5)
        );
        assert_eq!(resolve_analysis_date(&run, None, today).unwrap(), date(2024, 3, 10));
        assert_eq!(
            resolve_analysis_date(&RunToml::default(), None, today).unwrap(),
            date(2024, 5, 24)
        );
    }

    #[test]
    fn bad_date_is_an_error() {
        assert!(parse_date("10/03/2024").is_err());
    }

    #[test]
    fn settings_are_validated() {
        let processing = ProcessingToml::default();
        let ok = RunToml::default();
        let settings = build_index_settings(&ok, &processing).unwrap();
        assert_eq!(settings.intervals().unwrap().len(), 6);

        let dup = RunToml {
            intervals: vec![7, 7],
            ..RunToml::default()
        };
        assert!(build_index_settings(&dup, &processing).is_err());

        let one_day = RunToml {
            intervals: vec![1, 7],
            ..RunToml::default()
        };
        assert!(build_index_settings(&one_day, &processing).is_err());
    }

    #[test]
    fn threshold_and_domain_checks() {
        let bad = ProcessingToml {
            land_threshold: 1.5,
            ..ProcessingToml::default()
        };
        assert!(land_threshold(&bad).is_err());
        assert_eq!(land_threshold(&ProcessingToml::default()).unwrap(), 0.5);

        assert!(build_bounding_box(&DomainToml::default()).is_ok());
        let flipped = DomainToml {
            area: [44.0, -180.0, 76.0, -125.0],
        };
        assert!(build_bounding_box(&flipped).is_err());
    }
}
