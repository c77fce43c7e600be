//! ESRI Shapefile writer for `csv2shp`.
//!
//! [`ShapefileSink`] creates a `.shp`/`.shx`/`.dbf` triple with one attribute
//! field per schema entry and a geometry type derived from the resolved
//! geometry, then turns each incoming record into one feature.

pub mod error;
pub mod fields;
pub mod geometry;
pub mod sink;

pub use error::{Result, WriteError};
pub use geometry::{FeatureShape, LayerShape};
pub use sink::{ShapefileOptions, ShapefileSink, WriteSummary};
