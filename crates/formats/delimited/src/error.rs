use std::fmt;
use std::path::PathBuf;

use csv2shp_core_common::SourcePosition;
use thiserror::Error;

/// Which configured column a reference was meant to select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    X,
    Y,
    Geometry,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::X => f.write_str("X column"),
            ColumnRole::Y => f.write_str("Y column"),
            ColumnRole::Geometry => f.write_str("geometry column"),
        }
    }
}

/// Errors raised while inspecting or streaming a delimited file.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The input path could not be opened.
    #[error("Input file not found or unreadable: '{path}': {source}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file has no data row to sample.
    #[error("Input file '{path}' contains no data rows")]
    EmptyInput { path: PathBuf },

    /// A configured column reference does not select a column.
    #[error(
        "{role} '{reference}' does not match any of the {column_count} columns{}",
        header_hint(.has_header)
    )]
    ColumnMismatch {
        role: ColumnRole,
        reference: String,
        column_count: usize,
        has_header: bool,
    },

    /// The sampled WKT value does not start with a supported shape keyword.
    #[error("Unrecognized geometry type '{keyword}' at {position}")]
    UnrecognizedGeometryType {
        keyword: String,
        position: SourcePosition,
    },

    /// The underlying reader failed.
    #[error("Failed to read '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

fn header_hint(has_header: &bool) -> &'static str {
    if *has_header {
        ""
    } else {
        " (no header: use a 0-based index)"
    }
}

pub type Result<T> = std::result::Result<T, ReadError>;
