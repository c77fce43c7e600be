//! Delimited-text reader for `csv2shp`.
//!
//! Reading happens in two phases. [`inspect`] looks at the header and the
//! first data row to resolve the geometry columns and infer the attribute
//! schema. [`stream_rows`] then opens the file again and yields every data
//! row, the sampled one included, as a [`RecordStream`].

pub mod error;
pub mod infer;
pub mod reader;

pub use error::{ColumnRole, ReadError, Result};
pub use infer::{infer_schema, resolve_column, resolve_geometry, synthesize_headers};
pub use reader::{DelimitedOptions, Inspection, RecordStream, inspect, open, stream_rows};
