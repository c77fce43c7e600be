//! `csv2shp-core` drives the conversion of delimited text into an ESRI
//! Shapefile.
//!
//! This crate includes:
//! - **Operations**: [`operations::convert`] runs a full conversion and
//!   [`operations::inspect_file`] reports the inferred schema without writing.
//! - **Types**: conversion options, the record-error policy and run summaries.
//! - **Errors**: a taxonomy separating configuration, schema inference,
//!   library and per-record failures.
//!
//! The shared data model and the driver registry are re-exported from
//! `csv2shp-core-common`.

pub mod error;
pub mod operations;
pub mod types;

pub use csv2shp_core_common::drivers;
pub use csv2shp_core_common::{
    ColumnRef, FieldType, GeometryMode, GeometryShape, ResolvedGeometry, Schema,
    SchemaField,
};
pub use csv2shp_delimited::{DelimitedOptions, Inspection};
pub use csv2shp_shapefile::{LayerShape, ShapefileOptions};
