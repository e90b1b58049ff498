use chrono::NaiveDate;
use drought_calendar::{Doy, DoyWindow, analysis_date, is_january};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn doy_every_day_of_leap_year_is_sequential() {
    let mut expected = 1u16;
    for day in date(2024, 1, 1).iter_days().take(366) {
        assert_eq!(Doy::of(day).get(), expected, "mismatch at {day}");
        expected += 1;
    }
}

#[test]
fn window_ending_early_january_wraps() {
    // 12 days ending Jan 5 2024: Dec 25 2023 (doy 359) .. Jan 5 (doy 5).
    let w = DoyWindow::trailing(date(2024, 1, 5), 12).unwrap();
    assert!(w.is_wrapped());
    assert_eq!(w.start().get(), 359);
    assert_eq!(w.end().get(), 5);

    let doys: Vec<u16> = w.doys(366).iter().map(|d| d.get()).collect();
    let mut expected: Vec<u16> = (1..=5).collect();
    expected.extend(359..=366);
    assert_eq!(doys, expected);
}

#[test]
fn window_within_year_is_contiguous() {
    let w = DoyWindow::trailing(date(2023, 7, 31), 30).unwrap();
    assert!(!w.is_wrapped());
    assert_eq!(w.end().get() - w.start().get() + 1, 30);
    assert_eq!(w.doys(366).len(), 30);
}

#[test]
fn january_analysis_after_lag() {
    let today = date(2024, 1, 20);
    let analysed = analysis_date(today, 8).unwrap();
    assert_eq!(analysed, date(2024, 1, 12));
    assert!(is_january(analysed));
}
