use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use drought_calendar::{Doy, trailing_dates};
use drought_grid::{DailySeries, GridCoords, LandMask};
use drought_indices::{
    ClimatologyReference, DailyInputs, IndexContext, IndexError, IndexKind, IndexProcessor,
    IndexResults, IndexSettings, Interval, PrecipitationPercentOfNormal, References,
    compute_indices,
};
use drought_standardize::{GammaParameterSet, ParameterGrid};
use ndarray::{Array2, Array3, array};

// ---------------------------------------------------------------------------
// Fixture: 2x2 grid, 365 days ending 2024-03-10, latitude increasing
// ---------------------------------------------------------------------------

const TP_DAILY: f64 = 0.002;
const PEV_DAILY: f64 = -0.001;
const SD: f64 = 0.05;
const SOIL: f64 = 0.3;

fn analysis_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

fn coords() -> GridCoords {
    GridCoords::new(vec![60.0, 61.0], vec![-150.0, -149.0]).unwrap()
}

fn series(value: f64) -> DailySeries {
    let dates = trailing_dates(analysis_date(), 365).unwrap();
    let n = dates.len();
    DailySeries::new(dates, coords(), Array3::from_elem((n, 2, 2), value)).unwrap()
}

fn climatology(name: &'static str, values: Array2<f64>) -> ClimatologyReference {
    let values = Array3::from_shape_fn((366, 2, 2), |(_, r, c)| values[[r, c]]);
    ClimatologyReference::new(name, coords(), values).unwrap()
}

/// Exponential distribution with the mean of the daily input.
fn params(intervals: &[u32]) -> GammaParameterSet {
    let doy = Doy::of(analysis_date());
    let mut set = GammaParameterSet::new(coords());
    for &i in intervals {
        let grid = ParameterGrid::new(
            vec![doy],
            Array3::from_elem((1, 2, 2), 1.0),
            Array3::zeros((1, 2, 2)),
            Array3::from_elem((1, 2, 2), TP_DAILY),
        )
        .unwrap();
        set.insert(i, grid).unwrap();
    }
    set
}

fn inputs() -> DailyInputs {
    DailyInputs::new(series(TP_DAILY), series(SD), series(PEV_DAILY), series(SOIL)).unwrap()
}

fn references(intervals: &[u32]) -> References {
    References {
        // 0.2 cm per day: the 30-day normal equals the 30-day total.
        tp_climatology: climatology("tp", Array2::from_elem((2, 2), 0.2)),
        swe_climatology: climatology("swe", array![[0.0, 2.5], [2.5, 2.5]]),
        smd_climatology: climatology("swvl", Array2::from_elem((2, 2), 0.4)),
        spi_params: params(intervals),
        spei_params: params(intervals),
    }
}

/// Land fraction in input (increasing latitude) orientation; the pixel at
/// (60N, 150W) is 30% land.
fn mask() -> LandMask {
    LandMask::from_fraction(coords(), &array![[0.3, 0.9], [0.9, 0.9]], 0.5).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn two_by_two_scenario() {
    let intervals = [7, 30];
    let inputs = inputs();
    let references = references(&intervals);
    let settings = IndexSettings::new().with_intervals(intervals.to_vec());
    let ctx = IndexContext::new(&inputs, &references, &settings).unwrap();

    let out = compute_indices(&ctx, &mask()).unwrap();
    let days: Vec<u32> = out.iter().map(|d| d.interval().days()).collect();
    assert_eq!(days, vec![1, 7, 30]);

    let d30 = &out[2];
    assert_eq!(d30.reference_date(), analysis_date());
    assert_eq!(d30.coords().lats(), &[61.0, 60.0]);

    // Output row 0 is 61N (all land), row 1 is 60N.
    let tp = d30.field(IndexKind::Tp).unwrap();
    assert_abs_diff_eq!(tp[[0, 0]], 6.0, epsilon = 1e-9);
    let pntp = d30.field(IndexKind::Pntp).unwrap();
    assert_abs_diff_eq!(pntp[[0, 1]], 100.0, epsilon = 1e-9);

    // G = 1 - e^-1 for an input at the exponential mean.
    let spi = d30.field(IndexKind::Spi).unwrap();
    assert_abs_diff_eq!(spi[[0, 0]], 0.3375, epsilon = 0.1);
    let spei = d30.field(IndexKind::Spei).unwrap();
    assert_abs_diff_eq!(spei[[1, 1]], 0.3375, epsilon = 0.1);

    let swe = d30.field(IndexKind::Swe).unwrap();
    assert_abs_diff_eq!(swe[[0, 1]], 5.0, epsilon = 1e-9);
    let pnswe = d30.field(IndexKind::Pnswe).unwrap();
    assert_abs_diff_eq!(pnswe[[0, 1]], 200.0, epsilon = 1e-9);
    let smd = d30.field(IndexKind::Smd).unwrap();
    assert_abs_diff_eq!(smd[[0, 0]], 25.0, epsilon = 1e-9);

    let d7 = &out[1];
    assert_abs_diff_eq!(d7.field(IndexKind::Tp).unwrap()[[0, 0]], 1.4, epsilon = 1e-9);
    assert_abs_diff_eq!(d7.field(IndexKind::Pntp).unwrap()[[0, 0]], 100.0, epsilon = 1e-9);
}

#[test]
fn one_day_snapshot() {
    let intervals = [30];
    let inputs = inputs();
    let references = references(&intervals);
    let settings = IndexSettings::new().with_intervals(intervals.to_vec());
    let ctx = IndexContext::new(&inputs, &references, &settings).unwrap();
    let out = compute_indices(&ctx, &mask()).unwrap();
    let d1 = &out[0];
    assert_eq!(d1.interval(), Interval::ONE_DAY);

    assert_abs_diff_eq!(d1.field(IndexKind::Swe).unwrap()[[0, 0]], 5.0, epsilon = 1e-9);
    assert_abs_diff_eq!(d1.field(IndexKind::Smd).unwrap()[[0, 1]], 25.0, epsilon = 1e-9);
    for kind in [IndexKind::Tp, IndexKind::Pntp, IndexKind::Pnswe, IndexKind::Spi, IndexKind::Spei] {
        assert!(d1.field(kind).unwrap().iter().all(|v| v.is_nan()), "{kind}");
    }
}

#[test]
fn land_fraction_below_threshold() {
    let intervals = [30];
    let inputs = inputs();
    let references = references(&intervals);
    let settings = IndexSettings::new().with_intervals(intervals.to_vec());
    let ctx = IndexContext::new(&inputs, &references, &settings).unwrap();
    let out = compute_indices(&ctx, &mask()).unwrap();

    // (60N, 150W) is output row 1, column 0.
    for ds in &out {
        for kind in [IndexKind::Swe, IndexKind::Pnswe, IndexKind::Smd] {
            assert!(ds.field(kind).unwrap()[[1, 0]].is_nan(), "{kind} at {}", ds.interval());
        }
    }
    let d30 = &out[1];
    assert!(d30.field(IndexKind::Tp).unwrap()[[1, 0]].is_finite());
    assert!(d30.field(IndexKind::Spi).unwrap()[[1, 0]].is_finite());
}

#[test]
fn zero_snow_normal_is_one_hundred_percent() {
    let intervals = [30];
    let inputs = inputs();
    let references = references(&intervals);
    let settings = IndexSettings::new().with_intervals(intervals.to_vec());
    let ctx = IndexContext::new(&inputs, &references, &settings).unwrap();
    // All land, so the zero-normal pixel stays visible.
    let all_land = LandMask::from_fraction(coords(), &Array2::ones((2, 2)), 0.5).unwrap();
    let out = compute_indices(&ctx, &all_land).unwrap();
    assert_eq!(out[1].field(IndexKind::Pnswe).unwrap()[[1, 0]], 100.0);
}

#[test]
fn dependent_processor_refused_without_requirement() {
    let intervals = [30];
    let inputs = inputs();
    let references = references(&intervals);
    let settings = IndexSettings::new().with_intervals(intervals.to_vec());
    let ctx = IndexContext::new(&inputs, &references, &settings).unwrap();
    let mut results = IndexResults::new();
    let err = PrecipitationPercentOfNormal
        .run(&ctx, &mut results)
        .unwrap_err();
    assert_eq!(
        err,
        IndexError::MissingRequirement {
            index: IndexKind::Pntp,
            requires: IndexKind::Tp,
            interval: Interval::new(30).unwrap(),
        }
    );
    assert!(results.is_empty());
}

#[test]
fn missing_gamma_interval_is_fatal() {
    let inputs = inputs();
    let references = references(&[30]);
    let settings = IndexSettings::new().with_intervals(vec![30, 60]);
    let ctx = IndexContext::new(&inputs, &references, &settings).unwrap();
    let err = compute_indices(&ctx, &mask()).unwrap_err();
    assert!(matches!(err, IndexError::Standardize(_)));
}
