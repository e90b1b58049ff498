//! Analysis-date arithmetic and calendar predicates.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::CalendarError;

/// The date a run analyses: `today` minus the upstream availability lag.
///
/// # Errors
///
/// Returns [`CalendarError::DateOverflow`] if the subtraction underflows.
pub fn analysis_date(today: NaiveDate, lag_days: u32) -> Result<NaiveDate, CalendarError> {
    today
        .checked_sub_days(Days::new(u64::from(lag_days)))
        .ok_or(CalendarError::DateOverflow {
            date: today,
            days: lag_days,
        })
}

/// Whether `date` falls in January, in which case the current month is
/// also the whole of the current year so far.
pub fn is_january(date: NaiveDate) -> bool {
    date.month() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lag_crosses_year() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let date = analysis_date(today, 8).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 12, 28).unwrap());
        assert!(!is_january(date));
    }

    #[test]
    fn january_predicate() {
        assert!(is_january(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
        assert!(!is_january(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
    }

    #[test]
    fn underflow_is_error() {
        assert!(analysis_date(NaiveDate::MIN, 1).is_err());
    }
}
