//! Common types and traits shared across `csv2shp` crates.
//!
//! This crate provides the core abstractions that are shared between
//! `csv2shp-core` and the format crates, preventing circular dependencies.

pub mod drivers;
pub mod io;
pub mod position;
pub mod schema;

// Re-export commonly used types
pub use drivers::{Driver, DriverCapabilities, SupportStatus, find_driver, get_drivers};
pub use io::{FeatureSink, RecordSource};
pub use position::SourcePosition;
pub use schema::{
    ColumnRef, FieldType, GeometryMode, GeometryShape, Record, ResolvedGeometry, Schema,
    SchemaField,
};
