//! Schema and geometry inference from a single sample row.

use csv2shp_core_common::{
    ColumnRef, FieldType, GeometryMode, GeometryShape, Record, ResolvedGeometry, Schema,
    SchemaField,
};
use log::debug;

use crate::error::{ColumnRole, ReadError, Result};

/// Positional field names used when the file has no header.
///
/// ```
/// use csv2shp_delimited::synthesize_headers;
///
/// assert_eq!(synthesize_headers(3), vec!["Field0", "Field1", "Field2"]);
/// ```
#[must_use]
pub fn synthesize_headers(column_count: usize) -> Vec<String> {
    (0..column_count).map(|i| format!("Field{i}")).collect()
}

/// Resolves a column reference to a 0-based index.
///
/// A reference made only of digits is positional. Otherwise, when the file
/// has a header, it is matched against the header names and the first match
/// wins. Without a header only positional references resolve.
///
/// # Errors
///
/// Returns [`ReadError::ColumnMismatch`] if the reference does not select a
/// column in `[0, headers.len())`.
pub fn resolve_column(
    reference: &ColumnRef,
    headers: &[String],
    has_header: bool,
    role: ColumnRole,
) -> Result<usize> {
    let index = match reference.as_index() {
        Some(index) => Some(index),
        None if has_header => headers.iter().position(|name| name == reference.as_str()),
        None => None,
    };

    index
        .filter(|index| *index < headers.len())
        .ok_or_else(|| ReadError::ColumnMismatch {
            role,
            reference: reference.to_string(),
            column_count: headers.len(),
            has_header,
        })
}

/// Resolves the requested geometry against the header and the sample row.
///
/// In WKT mode the shape is taken from the leading keyword of the sampled
/// value and applies to every later row.
///
/// # Errors
///
/// Returns [`ReadError::ColumnMismatch`] for unresolved references (including
/// a WKT column missing from the sample row) and
/// [`ReadError::UnrecognizedGeometryType`] for an unknown WKT keyword.
pub fn resolve_geometry(
    mode: &GeometryMode,
    headers: &[String],
    has_header: bool,
    sample: &Record,
) -> Result<ResolvedGeometry> {
    match mode {
        GeometryMode::Xy { x, y } => {
            let x_index = resolve_column(x, headers, has_header, ColumnRole::X)?;
            let y_index = resolve_column(y, headers, has_header, ColumnRole::Y)?;
            debug!("X column index {x_index}, Y column index {y_index}");
            Ok(ResolvedGeometry::Xy { x_index, y_index })
        },
        GeometryMode::Wkt { geometry } => {
            let index = resolve_column(geometry, headers, has_header, ColumnRole::Geometry)?;
            let wkt = sample.get(index).ok_or_else(|| ReadError::ColumnMismatch {
                role: ColumnRole::Geometry,
                reference: geometry.to_string(),
                column_count: sample.len(),
                has_header,
            })?;

            let shape = GeometryShape::from_wkt(wkt).ok_or_else(|| {
                ReadError::UnrecognizedGeometryType {
                    keyword: GeometryShape::leading_keyword(wkt).to_string(),
                    position: sample.position().with_column_index(index),
                }
            })?;
            debug!("Geometry column index {index}, shape {shape}");
            Ok(ResolvedGeometry::Wkt { index, shape })
        },
    }
}

/// Builds the attribute schema: one field per header column that does not
/// feed the geometry, typed from the sample row.
///
/// Columns missing from a short sample row are typed as text.
#[must_use]
pub fn infer_schema(headers: &[String], sample: &Record, geometry: &ResolvedGeometry) -> Schema {
    let fields = headers
        .iter()
        .enumerate()
        .filter(|(index, _)| !geometry.is_source_column(*index))
        .map(|(index, name)| {
            let field_type = sample.get(index).map_or(FieldType::Text, FieldType::classify);
            SchemaField::new(name.clone(), field_type, index)
        })
        .collect();

    Schema::new(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn record(tokens: &[&str]) -> Record {
        Record::new(2, tokens.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn test_resolve_by_name_and_index() {
        let headers = headers(&["id", "x", "y"]);
        let by_name = resolve_column(&"y".into(), &headers, true, ColumnRole::Y).unwrap();
        let by_index = resolve_column(&"1".into(), &headers, true, ColumnRole::X).unwrap();
        assert_eq!(by_name, 2);
        assert_eq!(by_index, 1);
    }

    #[test]
    fn test_resolve_first_duplicate_wins() {
        let headers = headers(&["a", "dup", "dup"]);
        let index = resolve_column(&"dup".into(), &headers, true, ColumnRole::X).unwrap();
        assert_eq!(index, 1);
    }

    #[test]
    fn test_resolve_without_header_requires_index() {
        let headers = synthesize_headers(3);
        assert_eq!(
            resolve_column(&"2".into(), &headers, false, ColumnRole::X).unwrap(),
            2
        );
        let err = resolve_column(&"Field2".into(), &headers, false, ColumnRole::X).unwrap_err();
        assert!(matches!(err, ReadError::ColumnMismatch { .. }));
        assert!(err.to_string().contains("0-based index"));
    }

    #[test]
    fn test_resolve_out_of_range() {
        let headers = headers(&["id", "geom"]);
        let err = resolve_column(&"2".into(), &headers, true, ColumnRole::Geometry).unwrap_err();
        match err {
            ReadError::ColumnMismatch {
                role, column_count, ..
            } => {
                assert_eq!(role, ColumnRole::Geometry);
                assert_eq!(column_count, 2);
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_wkt_geometry() {
        let headers = headers(&["id", "geom"]);
        let sample = record(&["1", "LINESTRING (0 0, 1 1)"]);
        let geometry =
            resolve_geometry(&GeometryMode::wkt("geom"), &headers, true, &sample).unwrap();
        assert_eq!(
            geometry,
            ResolvedGeometry::Wkt {
                index: 1,
                shape: GeometryShape::LineString
            }
        );
    }

    #[test]
    fn test_resolve_unrecognized_wkt() {
        let headers = headers(&["id", "geom"]);
        let sample = record(&["1", "FOO (1 2)"]);
        let err =
            resolve_geometry(&GeometryMode::wkt("geom"), &headers, true, &sample).unwrap_err();
        match err {
            ReadError::UnrecognizedGeometryType { keyword, position } => {
                assert_eq!(keyword, "FOO");
                assert_eq!(position.to_string(), "line 2, column 2");
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wkt_column_missing_from_sample() {
        let headers = headers(&["id", "geom"]);
        let sample = record(&["1"]);
        let err =
            resolve_geometry(&GeometryMode::wkt("geom"), &headers, true, &sample).unwrap_err();
        assert!(matches!(err, ReadError::ColumnMismatch { .. }));
    }

    #[test]
    fn test_infer_schema_skips_geometry_columns() {
        let headers = headers(&["id", "x", "y", "name", "score"]);
        let sample = record(&["1", "10.5", "20.0", "alpha", "0.75"]);
        let geometry = ResolvedGeometry::Xy {
            x_index: 1,
            y_index: 2,
        };

        let schema = infer_schema(&headers, &sample, &geometry);
        let summary: Vec<_> = schema
            .iter()
            .map(|f| (f.name.as_str(), f.field_type, f.column_index))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("id", FieldType::Integer, 0),
                ("name", FieldType::Text, 3),
                ("score", FieldType::Real, 4),
            ]
        );
    }

    #[test]
    fn test_infer_schema_short_sample_defaults_to_text() {
        let headers = headers(&["id", "geom", "note"]);
        let sample = record(&["1", "POINT (1 2)"]);
        let geometry = ResolvedGeometry::Wkt {
            index: 1,
            shape: GeometryShape::Point,
        };

        let schema = infer_schema(&headers, &sample, &geometry);
        assert_eq!(schema.field("note").unwrap().field_type, FieldType::Text);
    }
}
