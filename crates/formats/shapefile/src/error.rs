use std::path::PathBuf;

use csv2shp_core_common::SourcePosition;
use thiserror::Error;

/// Errors raised while creating or filling a Shapefile.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The output driver is missing from the registry or cannot write.
    #[error("{driver} driver not available")]
    DriverUnavailable { driver: String },

    /// The output location cannot hold a new dataset.
    #[error("Creation of output dataset '{path}' failed: {reason}")]
    DatasetCreateFailed { path: PathBuf, reason: String },

    /// The `.shp`/`.shx`/`.dbf` files could not be created.
    #[error("Layer creation failed for '{path}': {source}")]
    LayerCreateFailed {
        path: PathBuf,
        #[source]
        source: shapefile::Error,
    },

    /// An attribute field cannot be defined.
    #[error("Creating field '{name}' failed: {reason}")]
    FieldCreateFailed { name: String, reason: String },

    /// The library rejected a feature.
    #[error("Failed to create feature at {position}: {source}")]
    FeatureCreateFailed {
        position: SourcePosition,
        #[source]
        source: shapefile::Error,
    },

    /// A coordinate or typed attribute token is not numeric, or is a number
    /// the field cannot store unchanged.
    #[error("Value '{value}' for {field} at {position} is not a number the field can hold")]
    NumericParseFailed {
        field: String,
        value: String,
        position: SourcePosition,
    },

    /// A WKT value is unparsable or does not match the layer's shape.
    #[error("Malformed geometry at {position}: {reason}")]
    MalformedGeometry {
        position: SourcePosition,
        reason: String,
    },
}

impl WriteError {
    /// Returns `true` for errors tied to a single input record rather than to
    /// the dataset as a whole.
    #[must_use]
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            WriteError::NumericParseFailed { .. } | WriteError::MalformedGeometry { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, WriteError>;
