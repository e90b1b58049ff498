//! Error types for the drought-standardize crate.

use drought_calendar::Doy;
use drought_grid::GridError;

/// Error type for all fallible operations in the drought-standardize crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StandardizeError {
    /// Returned when no parameters were fitted for an interval.
    #[error("no gamma parameters for the {interval}-day interval")]
    MissingInterval {
        /// Interval length in days.
        interval: u32,
    },

    /// Returned when an interval has no parameters for a day-of-year.
    #[error("no gamma parameters for day-of-year {doy} of the {interval}-day interval")]
    MissingDayOfYear {
        /// Interval length in days.
        interval: u32,
        /// Requested day-of-year.
        doy: Doy,
    },

    /// Returned when parameters for an interval are supplied twice.
    #[error("gamma parameters for the {interval}-day interval are supplied twice")]
    DuplicateInterval {
        /// Interval length in days.
        interval: u32,
    },

    /// Returned when the shape, location and scale arrays disagree.
    #[error("parameter array '{name}' has shape {got:?}, expected {expected:?}")]
    ParameterShape {
        /// Which parameter array.
        name: &'static str,
        /// Expected `[doy, lat, lon]` shape.
        expected: Vec<usize>,
        /// Actual shape.
        got: Vec<usize>,
    },

    /// Returned when a distribution cannot be constructed.
    ///
    /// The `message` field is a `String` because statrs errors do not
    /// implement `Clone`.
    #[error("distribution construction failed: {message}")]
    Distribution {
        /// Description of the failure.
        message: String,
    },

    /// Returned on a grid axis problem.
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_missing_interval() {
        let e = StandardizeError::MissingInterval { interval: 30 };
        assert_eq!(e.to_string(), "no gamma parameters for the 30-day interval");
    }

    #[test]
    fn error_missing_doy() {
        let e = StandardizeError::MissingDayOfYear {
            interval: 7,
            doy: Doy::new(366).unwrap(),
        };
        assert_eq!(
            e.to_string(),
            "no gamma parameters for day-of-year 366 of the 7-day interval"
        );
    }

    #[test]
    fn error_parameter_shape() {
        let e = StandardizeError::ParameterShape {
            name: "scale",
            expected: vec![366, 2, 2],
            got: vec![365, 2, 2],
        };
        assert_eq!(
            e.to_string(),
            "parameter array 'scale' has shape [365, 2, 2], expected [366, 2, 2]"
        );
    }

    #[test]
    fn error_from_grid() {
        let e: StandardizeError = GridError::EmptyAxis { axis: "latitude" }.into();
        assert!(matches!(e, StandardizeError::Grid(_)));
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<StandardizeError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<StandardizeError>();
    }
}
