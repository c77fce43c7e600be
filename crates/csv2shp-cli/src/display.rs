//! Display utilities for formatting CLI output.
//!
//! This module provides table row structures and formatting functions
//! for presenting inspections, conversion summaries and the driver registry.

use tabled::{Table, Tabled};

use csv2shp_core::drivers::Driver;
use csv2shp_core::types::ConversionSummary;
use csv2shp_core::{Inspection, ResolvedGeometry, Schema};

/// Table row representation for displaying attribute fields.
#[derive(Tabled)]
pub struct FieldRow {
    /// Name of the field.
    #[tabled(rename = "Field")]
    pub name: String,
    /// Inferred type of the field.
    #[tabled(rename = "Type")]
    pub field_type: String,
    /// 0-based input column feeding the field.
    #[tabled(rename = "Column")]
    pub column: usize,
}

/// Table row representation for displaying the geometry source.
#[derive(Tabled)]
pub struct GeometryRow {
    /// Geometry encoding (`xy` or `wkt`).
    #[tabled(rename = "Mode")]
    pub mode: String,
    /// Input column(s) holding the geometry.
    #[tabled(rename = "Columns")]
    pub columns: String,
    /// Inferred geometry shape.
    #[tabled(rename = "Shape")]
    pub shape: String,
}

/// Table row representation for displaying driver information.
#[derive(Tabled)]
pub struct DriverRow {
    /// Short identifier for the driver (e.g., `CSV`, `ESRI Shapefile`).
    #[tabled(rename = "Short Name")]
    pub short_name: String,
    /// Full descriptive name of the driver format.
    #[tabled(rename = "Long Name")]
    pub long_name: String,
    /// Support status for reading dataset metadata and information.
    #[tabled(rename = "Info")]
    pub info: String,
    /// Support status for reading data from this format.
    #[tabled(rename = "Read")]
    pub read: String,
    /// Support status for writing data to this format.
    #[tabled(rename = "Write")]
    pub write: String,
}

fn header_name(headers: &[String], index: usize) -> String {
    headers
        .get(index)
        .map_or_else(|| index.to_string(), |name| format!("{name} ({index})"))
}

#[must_use]
pub fn geometry_row(headers: &[String], geometry: &ResolvedGeometry) -> GeometryRow {
    let (mode, columns) = match geometry {
        ResolvedGeometry::Xy { x_index, y_index } => (
            "xy",
            format!(
                "{}, {}",
                header_name(headers, *x_index),
                header_name(headers, *y_index)
            ),
        ),
        ResolvedGeometry::Wkt { index, .. } => ("wkt", header_name(headers, *index)),
    };
    GeometryRow {
        mode: mode.to_string(),
        columns,
        shape: geometry.shape().to_string(),
    }
}

#[must_use]
pub fn field_rows(schema: &Schema) -> Vec<FieldRow> {
    schema
        .iter()
        .map(|f| FieldRow {
            name: f.name.clone(),
            field_type: f.field_type.to_string(),
            column: f.column_index,
        })
        .collect()
}

#[must_use]
pub fn driver_rows(drivers: &[Driver]) -> Vec<DriverRow> {
    drivers
        .iter()
        .map(|d| DriverRow {
            short_name: d.short_name.to_string(),
            long_name: d.long_name.to_string(),
            info: d.capabilities.info.as_str().to_string(),
            read: d.capabilities.read.as_str().to_string(),
            write: d.capabilities.write.as_str().to_string(),
        })
        .collect()
}

/// Display an inspection in formatted tables.
///
/// # Arguments
///
/// * `input` - The inspected file, as given on the command line
/// * `inspection` - The inferred columns, schema and geometry
pub fn display_inspection(input: &str, inspection: &Inspection) {
    println!("\nDataset: {input}");
    println!("Columns: {}", inspection.column_count());

    println!("\n=== Geometry ===");
    let geometry = geometry_row(&inspection.headers, &inspection.geometry);
    println!("{}", Table::new([geometry]));

    if inspection.schema.is_empty() {
        println!("\nNo attribute fields.");
    } else {
        println!("\n=== Fields ===");
        println!("{}", Table::new(field_rows(&inspection.schema)));
    }
}

/// Display the outcome of a conversion.
pub fn display_summary(summary: &ConversionSummary) {
    println!(
        "Wrote {} {} feature(s) to {}",
        summary.features_written,
        summary.shape,
        summary.output.display()
    );
    if summary.rows_skipped > 0 {
        println!(
            "Skipped {} of {} row(s)",
            summary.rows_skipped, summary.rows_read
        );
    }
}

/// Display the driver registry in a formatted table.
pub fn display_drivers(drivers: &[Driver]) {
    println!("\nAvailable Drivers ({} total):\n", drivers.len());
    println!("{}", Table::new(driver_rows(drivers)));
}
