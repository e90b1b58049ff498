use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use drought_assemble::{
    AssembleError, Fragment, FragmentData, FragmentKind, FragmentSet, RawVariable, WINDOW_DAYS,
    assemble_soil_moisture, assemble_variable,
};
use drought_grid::GridCoords;
use ndarray::Array3;

const STEPS_PER_DAY: i64 = 4;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn coords() -> GridCoords {
    GridCoords::new(vec![61.0, 60.0], vec![-150.0]).unwrap()
}

/// Six-hourly timestamps covering `first..=last`.
fn times(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDateTime> {
    let start = first.and_hms_opt(0, 0, 0).unwrap();
    let n = ((last - first).num_days() + 1) * STEPS_PER_DAY;
    (0..n)
        .map(|i| start + Duration::hours(i * 24 / STEPS_PER_DAY))
        .collect()
}

fn constant(kind: FragmentKind, first: NaiveDate, last: NaiveDate, value: f64) -> Fragment {
    let t = times(first, last);
    let values = Array3::from_elem((t.len(), 2, 1), value);
    Fragment::new(kind, t, coords(), FragmentData::Single(values))
}

/// A fragment whose first half sits in the final track and second half in
/// the provisional one.
fn tracked(kind: FragmentKind, first: NaiveDate, last: NaiveDate, value: f64) -> Fragment {
    let t = times(first, last);
    let n = t.len();
    let final_values =
        Array3::from_shape_fn((n, 2, 1), |(i, _, _)| if i < n / 2 { value } else { f64::NAN });
    let provisional =
        Array3::from_shape_fn((n, 2, 1), |(i, _, _)| if i < n / 2 { f64::NAN } else { value });
    Fragment::new(
        kind,
        t,
        coords(),
        FragmentData::Tracks {
            final_values,
            provisional,
        },
    )
}

fn march_fragments(value: f64) -> FragmentSet {
    FragmentSet::new()
        .with(constant(
            FragmentKind::PreviousYear,
            date(2023, 1, 1),
            date(2023, 12, 31),
            value,
        ))
        .with(tracked(
            FragmentKind::CurrentYear,
            date(2024, 1, 1),
            date(2024, 2, 29),
            value,
        ))
        .with(constant(
            FragmentKind::CurrentMonth,
            date(2024, 3, 1),
            date(2024, 3, 10),
            value,
        ))
}

#[test]
fn three_fragment_precipitation_window() {
    let analysis = date(2024, 3, 10);
    let daily =
        assemble_variable(RawVariable::TotalPrecipitation, march_fragments(0.001), analysis)
            .unwrap();
    assert_eq!(daily.len(), WINDOW_DAYS as usize);
    assert_eq!(daily.last_date(), Some(analysis));
    assert_eq!(daily.dates()[0], date(2023, 3, 12));
    assert!(daily.dates().contains(&date(2024, 2, 29)));
    for &v in daily.values() {
        assert_relative_eq!(v, 0.004, epsilon = 1e-12);
    }
}

#[test]
fn snow_depth_is_averaged() {
    let analysis = date(2024, 3, 10);
    let daily = assemble_variable(RawVariable::SnowDepth, march_fragments(0.3), analysis).unwrap();
    for &v in daily.values() {
        assert_relative_eq!(v, 0.3, epsilon = 1e-12);
    }
}

#[test]
fn january_uses_two_fragments_and_ignores_current_year() {
    let analysis = date(2024, 1, 20);
    let fragments = FragmentSet::new()
        .with(constant(
            FragmentKind::PreviousYear,
            date(2023, 1, 1),
            date(2023, 12, 31),
            0.5,
        ))
        // Would conflict with current_month if it were merged.
        .with(constant(
            FragmentKind::CurrentYear,
            date(2024, 1, 1),
            date(2024, 1, 20),
            9.0,
        ))
        .with(constant(
            FragmentKind::CurrentMonth,
            date(2024, 1, 1),
            date(2024, 1, 20),
            0.5,
        ));
    let daily = assemble_variable(RawVariable::SnowDepth, fragments, analysis).unwrap();
    assert_eq!(daily.len(), 365);
    assert_eq!(daily.dates()[0], date(2023, 1, 21));
    assert!(daily.values().iter().all(|&v| (v - 0.5).abs() < 1e-12));
}

#[test]
fn missing_current_year_outside_january() {
    let mut fragments = march_fragments(0.001);
    fragments.take(FragmentKind::CurrentYear);
    let err = assemble_variable(RawVariable::TotalPrecipitation, fragments, date(2024, 3, 10))
        .unwrap_err();
    assert_eq!(
        err,
        AssembleError::MissingFragment {
            variable: "tp",
            fragment: FragmentKind::CurrentYear,
        }
    );
}

#[test]
fn overlapping_tracks_are_fatal() {
    let t = times(date(2024, 1, 1), date(2024, 2, 29));
    let both = Array3::from_elem((t.len(), 2, 1), 0.001);
    let bad = Fragment::new(
        FragmentKind::CurrentYear,
        t,
        coords(),
        FragmentData::Tracks {
            final_values: both.clone(),
            provisional: both,
        },
    );
    let fragments = march_fragments(0.001).with(bad);
    let err = assemble_variable(RawVariable::TotalPrecipitation, fragments, date(2024, 3, 10))
        .unwrap_err();
    assert!(matches!(
        err,
        AssembleError::TrackConflict {
            fragment: FragmentKind::CurrentYear,
            missing: 0,
            ..
        }
    ));
}

#[test]
fn short_data_does_not_cover_window() {
    let analysis = date(2024, 3, 12);
    let err = assemble_variable(RawVariable::SnowDepth, march_fragments(0.1), analysis)
        .unwrap_err();
    assert!(matches!(err, AssembleError::WindowNotCovered { .. }));
}

#[test]
fn gap_inside_window() {
    let fragments = FragmentSet::new()
        .with(constant(
            FragmentKind::PreviousYear,
            date(2023, 1, 1),
            date(2023, 12, 30),
            0.1,
        ))
        .with(constant(
            FragmentKind::CurrentYear,
            date(2024, 1, 1),
            date(2024, 2, 29),
            0.1,
        ))
        .with(constant(
            FragmentKind::CurrentMonth,
            date(2024, 3, 1),
            date(2024, 3, 10),
            0.1,
        ));
    let err = assemble_variable(RawVariable::SnowDepth, fragments, date(2024, 3, 10)).unwrap_err();
    assert_eq!(
        err,
        AssembleError::WindowGap {
            variable: "sd",
            after: date(2023, 12, 30),
        }
    );
}

#[test]
fn soil_layers_are_weighted() {
    let analysis = date(2024, 3, 10);
    let daily =
        assemble_soil_moisture(march_fragments(0.2), march_fragments(0.4), analysis).unwrap();
    assert_eq!(daily.len(), 365);
    for &v in daily.values() {
        assert_relative_eq!(v, 0.25 * 0.2 + 0.75 * 0.4, epsilon = 1e-12);
    }
}
