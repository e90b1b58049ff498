//! Error types for drought-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the drought-io crate.
///
/// This enum covers file-system and NetCDF failures, malformed
/// coordinates, time axes and attributes, and data-model errors raised
/// while turning file contents into grids and references.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Wraps a file-system error.
    #[error("i/o error on {}: {reason}", path.display())]
    Filesystem {
        /// Path involved.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// Returned when a required variable is not present in a file.
    #[error("variable '{name}' not found in {}", path.display())]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a variable lacks an expected dimension.
    #[error("variable '{variable}' in {} has no '{name}' dimension", path.display())]
    MissingDimension {
        /// Name (or first alias) of the missing dimension.
        name: String,
        /// Variable that was inspected.
        variable: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a dimension has an unexpected size.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when a time value cannot be parsed or is out of range.
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// Description of the time parsing issue.
        reason: String,
    },

    /// Returned when a coordinate value cannot be interpreted.
    #[error("invalid coordinate '{name}': {reason}")]
    InvalidCoordinate {
        /// Coordinate variable.
        name: String,
        /// Description of the problem.
        reason: String,
    },

    /// Wraps a grid model error.
    #[error("grid error: {reason}")]
    Grid {
        /// Description of the underlying grid failure.
        reason: String,
    },

    /// Wraps an error raised while building a reference.
    #[error("reference error: {reason}")]
    Reference {
        /// Description of the underlying failure.
        reason: String,
    },
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}

impl From<drought_grid::GridError> for IoError {
    fn from(e: drought_grid::GridError) -> Self {
        IoError::Grid {
            reason: e.to_string(),
        }
    }
}

impl From<drought_standardize::StandardizeError> for IoError {
    fn from(e: drought_standardize::StandardizeError) -> Self {
        IoError::Reference {
            reason: e.to_string(),
        }
    }
}

impl From<drought_indices::IndexError> for IoError {
    fn from(e: drought_indices::IndexError) -> Self {
        IoError::Reference {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.nc"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.nc");
    }

    #[test]
    fn display_missing_dimension() {
        let err = IoError::MissingDimension {
            name: "dparams".to_string(),
            variable: "params".to_string(),
            path: PathBuf::from("/data/spi.nc"),
        };
        assert_eq!(
            err.to_string(),
            "variable 'params' in /data/spi.nc has no 'dparams' dimension"
        );
    }

    #[test]
    fn display_dimension_mismatch() {
        let err = IoError::DimensionMismatch {
            name: "dparams".to_string(),
            expected: 3,
            got: 2,
        };
        assert_eq!(
            err.to_string(),
            "dimension 'dparams' mismatch: expected 3, got 2"
        );
    }

    #[test]
    fn display_invalid_time() {
        let err = IoError::InvalidTime {
            reason: "unknown unit 'fortnights'".to_string(),
        };
        assert_eq!(err.to_string(), "invalid time: unknown unit 'fortnights'");
    }

    #[test]
    fn from_netcdf_error() {
        let nc_err = netcdf::Error::Str("test nc error".to_string());
        let err: IoError = nc_err.into();
        assert!(matches!(err, IoError::Netcdf { .. }));
        assert!(err.to_string().contains("test nc error"));
    }

    #[test]
    fn from_grid_error() {
        let err: IoError = drought_grid::GridError::EmptyAxis { axis: "latitude" }.into();
        assert!(matches!(err, IoError::Grid { .. }));
    }

    #[test]
    fn from_reference_errors() {
        let err: IoError =
            drought_standardize::StandardizeError::MissingInterval { interval: 30 }.into();
        assert!(matches!(err, IoError::Reference { .. }));
        let err: IoError = drought_indices::IndexError::InvalidInterval { days: 0 }.into();
        assert!(err.to_string().contains("invalid interval"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
