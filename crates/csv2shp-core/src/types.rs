//! Data types for conversion runs.
//!
//! This module defines the options a conversion is configured with, the
//! stages a run moves through, and the summary it reports.

use std::fmt;
use std::path::PathBuf;

use csv2shp_core_common::{GeometryMode, ResolvedGeometry, Schema};
use csv2shp_delimited::DelimitedOptions;
use csv2shp_shapefile::{LayerShape, ShapefileOptions};

use crate::error::{Csv2ShpError, Result};

/// What to do with a record that cannot be converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnRecordError {
    /// Stop the conversion at the first bad record
    #[default]
    Abort,
    /// Log a warning, skip the record and keep going
    Skip,
}

/// Options for a single conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Delimited text file to read
    pub input: PathBuf,
    /// Shapefile to create (`.shp` is enforced)
    pub output: PathBuf,
    /// Delimiter and header settings
    pub delimited: DelimitedOptions,
    /// How the geometry is encoded in each row
    pub mode: GeometryMode,
    /// Output field widths, driver and overwrite settings
    pub shapefile: ShapefileOptions,
    /// Record-error policy (default: abort)
    pub on_record_error: OnRecordError,
}

impl ConvertOptions {
    /// Create options with default reader and writer settings
    #[must_use]
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, mode: GeometryMode) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            delimited: DelimitedOptions::default(),
            mode,
            shapefile: ShapefileOptions::default(),
            on_record_error: OnRecordError::default(),
        }
    }

    /// Set the reader options
    #[must_use]
    pub fn with_delimited(mut self, delimited: DelimitedOptions) -> Self {
        self.delimited = delimited;
        self
    }

    /// Set the writer options
    #[must_use]
    pub fn with_shapefile(mut self, shapefile: ShapefileOptions) -> Self {
        self.shapefile = shapefile;
        self
    }

    /// Set the record-error policy
    #[must_use]
    pub fn with_on_record_error(mut self, policy: OnRecordError) -> Self {
        self.on_record_error = policy;
        self
    }
}

/// Lifecycle of a conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Uninitialized,
    SchemaInferred,
    Writing,
    Closed,
    Aborted,
}

impl Stage {
    /// Returns `true` if a run in this stage may move to `next`.
    ///
    /// Runs advance one stage at a time. Any stage that is not terminal may
    /// abort.
    #[must_use]
    pub fn can_transition_to(self, next: Stage) -> bool {
        matches!(
            (self, next),
            (Stage::Uninitialized, Stage::SchemaInferred)
                | (Stage::SchemaInferred, Stage::Writing)
                | (Stage::Writing, Stage::Closed)
                | (
                    Stage::Uninitialized | Stage::SchemaInferred | Stage::Writing,
                    Stage::Aborted
                )
        )
    }

    /// Moves to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`Csv2ShpError::Stage`] if the transition skips or revisits a
    /// stage.
    pub fn transition(self, next: Stage) -> Result<Stage> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(Csv2ShpError::Stage {
                from: self,
                to: next,
            })
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Closed | Stage::Aborted)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Uninitialized => "uninitialized",
            Stage::SchemaInferred => "schema-inferred",
            Stage::Writing => "writing",
            Stage::Closed => "closed",
            Stage::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Outcome of a completed conversion.
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    /// Data rows read from the input
    pub rows_read: u64,
    /// Features written to the output
    pub features_written: u64,
    /// Rows skipped under [`OnRecordError::Skip`]
    pub rows_skipped: u64,
    /// Attribute schema of the output layer
    pub schema: Schema,
    /// Geometry source the features were built from
    pub geometry: ResolvedGeometry,
    /// Shape type of the output layer
    pub shape: LayerShape,
    /// Path of the written `.shp` file
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_advance_in_order() {
        let stage = Stage::Uninitialized
            .transition(Stage::SchemaInferred)
            .and_then(|s| s.transition(Stage::Writing))
            .and_then(|s| s.transition(Stage::Closed))
            .unwrap();
        assert_eq!(stage, Stage::Closed);
        assert!(stage.is_terminal());
    }

    #[test]
    fn test_skipping_a_stage_is_rejected() {
        let err = Stage::Uninitialized.transition(Stage::Writing).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid conversion stage transition from uninitialized to writing"
        );
        assert!(!Stage::SchemaInferred.can_transition_to(Stage::Closed));
        assert!(!Stage::Closed.can_transition_to(Stage::Writing));
    }

    #[test]
    fn test_abort_only_from_live_stages() {
        assert!(Stage::Uninitialized.can_transition_to(Stage::Aborted));
        assert!(Stage::Writing.can_transition_to(Stage::Aborted));
        assert!(!Stage::Closed.can_transition_to(Stage::Aborted));
        assert!(!Stage::Aborted.can_transition_to(Stage::Aborted));
    }

    #[test]
    fn test_convert_options_builders() {
        let options = ConvertOptions::new("in.csv", "out.shp", GeometryMode::wkt("geom"))
            .with_delimited(DelimitedOptions::default().with_delimiter(b','))
            .with_on_record_error(OnRecordError::Skip);
        assert_eq!(options.delimited.delimiter, b',');
        assert!(options.delimited.has_header);
        assert_eq!(options.on_record_error, OnRecordError::Skip);
        assert_eq!(options.shapefile.text_width, 100);
    }
}
