//! Error types for the drought-calendar crate.

use chrono::NaiveDate;

/// Error type for all fallible operations in the drought-calendar crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a day-of-year value is outside the valid range 1..=366.
    #[error("invalid day of year: {doy} (must be 1..=366)")]
    InvalidDoy {
        /// The invalid day-of-year value that was provided.
        doy: u16,
    },

    /// Returned when a trailing window length is zero or longer than a year.
    #[error("invalid window length: {days} days (must be 1..=366)")]
    InvalidWindowLength {
        /// The requested number of days.
        days: u32,
    },

    /// Returned when date arithmetic leaves the representable range.
    #[error("date overflow: {date} minus {days} days")]
    DateOverflow {
        /// The date the arithmetic started from.
        date: NaiveDate,
        /// The number of days subtracted.
        days: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_doy() {
        let err = CalendarError::InvalidDoy { doy: 0 };
        assert_eq!(err.to_string(), "invalid day of year: 0 (must be 1..=366)");
    }

    #[test]
    fn error_invalid_window_length() {
        let err = CalendarError::InvalidWindowLength { days: 0 };
        assert_eq!(
            err.to_string(),
            "invalid window length: 0 days (must be 1..=366)"
        );
    }

    #[test]
    fn error_date_overflow() {
        let err = CalendarError::DateOverflow {
            date: NaiveDate::MIN,
            days: 8,
        };
        assert!(err.to_string().starts_with("date overflow"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<CalendarError>();
    }
}
