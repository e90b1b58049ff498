//! Hourly to daily resampling.

use chrono::NaiveDate;
use drought_grid::{DailySeries, HourlySeries, nan_mean_time, nan_sum_time};
use ndarray::{Array2, Array3, ArrayView3, Axis, s};

use crate::error::AssembleError;
use crate::variable::DailyAggregation;

/// Aggregate an hourly series to calendar days.
///
/// Hours are grouped by the calendar date of their timestamp. Missing hours
/// are skipped; a day whose hours are all missing is missing.
///
/// # Errors
///
/// Returns [`AssembleError::Grid`] if the resulting series is malformed.
pub fn resample_daily(
    hourly: &HourlySeries,
    aggregation: DailyAggregation,
) -> Result<DailySeries, AssembleError> {
    let reduce: fn(ArrayView3<'_, f64>) -> Array2<f64> = match aggregation {
        DailyAggregation::Sum => nan_sum_time,
        DailyAggregation::Mean => nan_mean_time,
    };

    // Timestamps are strictly increasing, so each day is one contiguous run.
    let mut runs: Vec<(NaiveDate, usize, usize)> = Vec::new();
    for (i, time) in hourly.times().iter().enumerate() {
        let day = time.date();
        match runs.last_mut() {
            Some((d, _, end)) if *d == day => *end = i + 1,
            _ => runs.push((day, i, i + 1)),
        }
    }

    let (ny, nx) = hourly.coords().shape();
    let mut values = Array3::from_elem((runs.len(), ny, nx), f64::NAN);
    for (t, &(_, start, end)) in runs.iter().enumerate() {
        let day = reduce(hourly.values().slice(s![start..end, .., ..]));
        values.index_axis_mut(Axis(0), t).assign(&day);
    }

    let dates = runs.into_iter().map(|(d, _, _)| d).collect();
    Ok(DailySeries::new(dates, hourly.coords().clone(), values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDateTime;
    use drought_grid::GridCoords;

    fn hourly(values: Vec<f64>) -> HourlySeries {
        let start: NaiveDateTime = NaiveDate::from_ymd_opt(2024, 2, 28)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let times = (0..values.len() as i64)
            .map(|h| start + chrono::Duration::hours(h))
            .collect();
        let coords = GridCoords::new(vec![60.0], vec![-150.0]).unwrap();
        let n = values.len();
        HourlySeries::new(times, coords, Array3::from_shape_vec((n, 1, 1), values).unwrap())
            .unwrap()
    }

    #[test]
    fn sums_and_means_per_day() {
        let mut v = vec![0.001; 24];
        v.extend(vec![2.0; 12]);
        let series = hourly(v);

        let sum = resample_daily(&series, DailyAggregation::Sum).unwrap();
        assert_eq!(sum.len(), 2);
        assert_relative_eq!(sum.values()[[0, 0, 0]], 0.024, epsilon = 1e-12);
        assert_relative_eq!(sum.values()[[1, 0, 0]], 24.0);
        assert_eq!(
            sum.dates()[1],
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );

        let mean = resample_daily(&series, DailyAggregation::Mean).unwrap();
        assert_relative_eq!(mean.values()[[0, 0, 0]], 0.001);
        assert_relative_eq!(mean.values()[[1, 0, 0]], 2.0);
    }

    #[test]
    fn missing_hours_are_skipped() {
        let mut v = vec![f64::NAN; 24];
        v[3] = 1.0;
        v[4] = 3.0;
        v.extend(vec![f64::NAN; 24]);
        let series = hourly(v);
        let mean = resample_daily(&series, DailyAggregation::Mean).unwrap();
        assert_relative_eq!(mean.values()[[0, 0, 0]], 2.0);
        assert!(mean.values()[[1, 0, 0]].is_nan());
    }
}
