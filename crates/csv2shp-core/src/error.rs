//! Error taxonomy for conversion runs.
//!
//! Format crates report their own errors ([`ReadError`], [`WriteError`]).
//! Converting them into [`Csv2ShpError`] sorts each failure into the class
//! that decides how a run reacts to it: configuration problems and schema
//! inference failures stop a run before any output exists, library failures
//! abort a run in progress, and record failures can be skipped on request.

use csv2shp_delimited::ReadError;
use csv2shp_shapefile::WriteError;
use thiserror::Error;

use crate::types::Stage;

/// Main error type for `csv2shp` operations.
#[derive(Debug, Error)]
pub enum Csv2ShpError {
    /// Invalid options, unreadable input or unresolved column references
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The sample row could not be interpreted
    #[error(transparent)]
    SchemaInference(ReadError),

    /// Reading the input failed after the schema was inferred
    #[error(transparent)]
    Io(ReadError),

    /// The vector library failed to create the dataset, a field or a feature
    #[error(transparent)]
    Library(WriteError),

    /// A single record could not be converted
    #[error(transparent)]
    Record(WriteError),

    /// The conversion driver was asked to skip a stage
    #[error("Invalid conversion stage transition from {from} to {to}")]
    Stage {
        /// Stage the driver was in
        from: Stage,
        /// Stage it was asked to enter
        to: Stage,
    },

    /// Generic errors from dependencies
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration errors.
///
/// These are detected before anything is written to the output.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid option value
    #[error("Invalid {option} option: {message}")]
    InvalidOption {
        /// The option name
        option: String,
        /// Why it's invalid
        message: String,
    },

    /// Required option is missing
    #[error("Missing required option: {option}")]
    MissingRequired {
        /// The missing option name
        option: String,
    },

    /// The input cannot be used as configured
    #[error(transparent)]
    Input(ReadError),
}

/// Type alias for Results using `Csv2ShpError`.
pub type Result<T> = std::result::Result<T, Csv2ShpError>;

impl From<ReadError> for Csv2ShpError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::FileNotFound { .. }
            | ReadError::EmptyInput { .. }
            | ReadError::ColumnMismatch { .. } => Self::Config(ConfigError::Input(err)),
            ReadError::UnrecognizedGeometryType { .. } => Self::SchemaInference(err),
            ReadError::Csv { .. } => Self::Io(err),
        }
    }
}

impl From<WriteError> for Csv2ShpError {
    fn from(err: WriteError) -> Self {
        if err.is_record_error() {
            Self::Record(err)
        } else {
            Self::Library(err)
        }
    }
}

impl Csv2ShpError {
    /// Get a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(e) => format!("Configuration error: {e}"),
            Self::SchemaInference(e) => format!("Schema inference failed: {e}"),
            Self::Io(e) => format!("Read error: {e}"),
            Self::Library(e) => format!("Shapefile error: {e}"),
            Self::Record(e) => format!("Invalid record: {e}"),
            Self::Stage { .. } => format!("Internal error: {self}"),
            Self::Other(e) => format!("Error: {e}"),
        }
    }

    /// Get recovery suggestions if available.
    #[must_use]
    pub fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Config(ConfigError::Input(ReadError::FileNotFound { .. })) => {
                Some("Check that the input path is correct and readable.".to_string())
            },
            Self::Config(ConfigError::Input(ReadError::ColumnMismatch { .. })) => Some(
                "Check the column names against the header, or pass a 0-based column index."
                    .to_string(),
            ),
            Self::Config(ConfigError::Input(ReadError::EmptyInput { .. })) => {
                Some("Check the header flag: a header-only file has nothing to convert.".to_string())
            },
            Self::SchemaInference(_) => Some(
                "Supported WKT types are POINT, LINESTRING, POLYGON, MULTIPOINT, \
                 MULTILINESTRING and MULTIPOLYGON."
                    .to_string(),
            ),
            Self::Library(WriteError::FieldCreateFailed { .. }) => Some(
                "Shapefile field names must be unique and at most 11 bytes; rename the header \
                 column."
                    .to_string(),
            ),
            Self::Library(WriteError::DatasetCreateFailed { .. }) => {
                Some("Choose another output path or pass --overwrite.".to_string())
            },
            Self::Record(_) => {
                Some("Fix the offending row or pass --skip-invalid to skip such rows.".to_string())
            },
            _ => None,
        }
    }

    /// Returns `true` for failures tied to a single record, which a run
    /// configured to skip invalid records can step over.
    #[must_use]
    pub fn is_record_error(&self) -> bool {
        matches!(self, Self::Record(_))
    }
}
