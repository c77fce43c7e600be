//! Attribute table definition and per-record value conversion.

use csv2shp_core_common::schema::is_integer_literal;
use csv2shp_core_common::{FieldType, Record, Schema, SchemaField};
use dbase::{FieldName, FieldValue, TableWriterBuilder};

use crate::error::{Result, WriteError};
use crate::sink::ShapefileOptions;

/// dBase field names are stored in 11 bytes.
pub const MAX_FIELD_NAME_BYTES: usize = 11;

/// Defines one dBase field per schema entry, in schema order.
///
/// # Errors
///
/// Returns [`WriteError::FieldCreateFailed`] for empty, over-long or
/// duplicate (ignoring ASCII case) field names.
pub fn table_builder(schema: &Schema, options: &ShapefileOptions) -> Result<TableWriterBuilder> {
    let mut builder = TableWriterBuilder::new();
    let mut seen: Vec<&str> = Vec::with_capacity(schema.len());

    for field in schema.iter() {
        let name = field_name(field)?;
        if seen.iter().any(|other| other.eq_ignore_ascii_case(&field.name)) {
            return Err(WriteError::FieldCreateFailed {
                name: field.name.clone(),
                reason: "duplicate field name".to_string(),
            });
        }
        seen.push(&field.name);

        builder = match field.field_type {
            FieldType::Integer => builder.add_numeric_field(name, options.integer_width, 0),
            FieldType::Real => {
                builder.add_numeric_field(name, options.real_width, options.real_decimals)
            },
            FieldType::Text => builder.add_character_field(name, options.text_width),
        };
    }

    Ok(builder)
}

fn field_name(field: &SchemaField) -> Result<FieldName> {
    let failed = |reason: String| WriteError::FieldCreateFailed {
        name: field.name.clone(),
        reason,
    };

    if field.name.is_empty() {
        return Err(failed("field name is empty".to_string()));
    }
    if field.name.len() > MAX_FIELD_NAME_BYTES {
        return Err(failed(format!(
            "field names are limited to {MAX_FIELD_NAME_BYTES} bytes"
        )));
    }
    FieldName::try_from(field.name.as_str()).map_err(|_| failed("invalid field name".to_string()))
}

/// Largest integer magnitude an `f64` holds exactly.
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// Converts the token feeding `field` into a dBase value.
///
/// Missing and empty tokens become nulls. Text longer than the field width
/// is cut at the last character boundary that fits.
///
/// # Errors
///
/// Returns [`WriteError::NumericParseFailed`] if an `Integer` or `Real`
/// field receives a token that is not numeric or that the field cannot
/// store unchanged: integers wider than `integer_width` or beyond 2^53, and
/// reals longer than `real_width`.
pub fn field_value(
    field: &SchemaField,
    record: &Record,
    options: &ShapefileOptions,
) -> Result<FieldValue> {
    let token = record.get(field.column_index).filter(|token| !token.is_empty());

    let numeric = |value: Option<f64>, token: &str| {
        value
            .map(|v| FieldValue::Numeric(Some(v)))
            .ok_or_else(|| WriteError::NumericParseFailed {
                field: field.name.clone(),
                value: token.to_string(),
                position: record.position().with_column_index(field.column_index),
            })
    };

    match (field.field_type, token) {
        (FieldType::Integer | FieldType::Real, None) => Ok(FieldValue::Numeric(None)),
        (FieldType::Integer, Some(token)) => {
            numeric(integer_value(token, options.integer_width), token)
        },
        (FieldType::Real, Some(token)) => numeric(real_value(token, options.real_width), token),
        (FieldType::Text, None) => Ok(FieldValue::Character(None)),
        (FieldType::Text, Some(token)) => Ok(FieldValue::Character(Some(
            truncate(token, usize::from(options.text_width)).to_string(),
        ))),
    }
}

#[allow(clippy::cast_precision_loss)] // bounded by MAX_EXACT_INTEGER
fn integer_value(token: &str, width: u8) -> Option<f64> {
    if !is_integer_literal(token) {
        return None;
    }
    let value = token.parse::<i64>().ok()?;
    let fits = value.to_string().len() <= usize::from(width);
    (fits && value.unsigned_abs() <= MAX_EXACT_INTEGER).then_some(value as f64)
}

fn real_value(token: &str, width: u8) -> Option<f64> {
    if token.len() > usize::from(width) {
        return None;
    }
    token.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Builds the dBase record for one input record.
///
/// # Errors
///
/// See [`field_value`].
pub fn attributes(
    schema: &Schema,
    record: &Record,
    options: &ShapefileOptions,
) -> Result<dbase::Record> {
    let mut attributes = dbase::Record::default();
    for field in schema.iter() {
        attributes.insert(field.name.clone(), field_value(field, record, options)?);
    }
    Ok(attributes)
}

fn truncate(value: &str, max_bytes: usize) -> &str {
    if value.len() <= max_bytes {
        return value;
    }
    let mut end = max_bytes;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tokens: &[&str]) -> Record {
        Record::new(5, tokens.iter().map(ToString::to_string).collect())
    }

    fn schema(fields: &[(&str, FieldType)]) -> Schema {
        Schema::new(
            fields
                .iter()
                .enumerate()
                .map(|(i, (name, ty))| SchemaField::new(*name, *ty, i))
                .collect(),
        )
    }

    #[test]
    fn test_integer_value() {
        let field = SchemaField::new("id", FieldType::Integer, 0);
        let value = field_value(&field, &record(&["-12"]), &ShapefileOptions::default()).unwrap();
        assert_eq!(value, FieldValue::Numeric(Some(-12.0)));
    }

    #[test]
    fn test_integer_rejects_real() {
        let field = SchemaField::new("id", FieldType::Integer, 0);
        let err = field_value(&field, &record(&["1.5"]), &ShapefileOptions::default()).unwrap_err();
        match err {
            WriteError::NumericParseFailed {
                field, position, ..
            } => {
                assert_eq!(field, "id");
                assert_eq!(position.to_string(), "line 5, column 1");
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_integer_keeps_exact_values() {
        let field = SchemaField::new("id", FieldType::Integer, 0);
        let options = ShapefileOptions::default();
        let value = field_value(&field, &record(&["9007199254740992"]), &options).unwrap();
        assert_eq!(value, FieldValue::Numeric(Some(9_007_199_254_740_992.0)));
        let value = field_value(&field, &record(&["+42"]), &options).unwrap();
        assert_eq!(value, FieldValue::Numeric(Some(42.0)));
    }

    #[test]
    fn test_integer_rejects_values_it_cannot_store() {
        let field = SchemaField::new("id", FieldType::Integer, 0);
        let options = ShapefileOptions::default();
        for token in ["12345678901234567", "123456789012345678901", "-9007199254740993"] {
            let err = field_value(&field, &record(&[token]), &options).unwrap_err();
            match err {
                WriteError::NumericParseFailed { value, .. } => assert_eq!(value, token),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_integer_respects_field_width() {
        let field = SchemaField::new("id", FieldType::Integer, 0);
        let options = ShapefileOptions {
            integer_width: 4,
            ..ShapefileOptions::default()
        };
        assert!(field_value(&field, &record(&["9999"]), &options).is_ok());
        assert!(field_value(&field, &record(&["-999"]), &options).is_ok());
        assert!(field_value(&field, &record(&["-1000"]), &options).is_err());
        assert!(field_value(&field, &record(&["10000"]), &options).is_err());
    }

    #[test]
    fn test_real_rejects_wide_and_non_finite_values() {
        let field = SchemaField::new("score", FieldType::Real, 0);
        let options = ShapefileOptions::default();
        let wide = "0.12345678901234567890123";
        assert!(wide.len() > usize::from(options.real_width));
        assert!(field_value(&field, &record(&[wide]), &options).is_err());
        assert!(field_value(&field, &record(&["inf"]), &options).is_err());
        assert!(field_value(&field, &record(&["NaN"]), &options).is_err());
    }

    #[test]
    fn test_real_rejects_text() {
        let field = SchemaField::new("score", FieldType::Real, 0);
        let err = field_value(&field, &record(&["n/a"]), &ShapefileOptions::default());
        assert!(matches!(err, Err(WriteError::NumericParseFailed { .. })));
    }

    #[test]
    fn test_real_accepts_integer_token() {
        let field = SchemaField::new("score", FieldType::Real, 0);
        let value = field_value(&field, &record(&["3"]), &ShapefileOptions::default()).unwrap();
        assert_eq!(value, FieldValue::Numeric(Some(3.0)));
    }

    #[test]
    fn test_missing_and_empty_tokens_are_null() {
        let options = ShapefileOptions::default();
        let row = record(&["", "x"]);
        let id = SchemaField::new("id", FieldType::Integer, 0);
        let note = SchemaField::new("note", FieldType::Text, 2);
        assert_eq!(
            field_value(&id, &row, &options).unwrap(),
            FieldValue::Numeric(None)
        );
        assert_eq!(
            field_value(&note, &row, &options).unwrap(),
            FieldValue::Character(None)
        );
    }

    #[test]
    fn test_text_is_truncated_on_char_boundary() {
        let options = ShapefileOptions::default().with_text_width(4);
        let field = SchemaField::new("name", FieldType::Text, 0);
        let value = field_value(&field, &record(&["abcdef"]), &options).unwrap();
        assert_eq!(value, FieldValue::Character(Some("abcd".to_string())));

        let value = field_value(&field, &record(&["abcé"]), &options).unwrap();
        assert_eq!(value, FieldValue::Character(Some("abc".to_string())));
    }

    #[test]
    fn test_table_builder_rejects_long_names() {
        let schema = schema(&[("a_very_long_name", FieldType::Text)]);
        let Err(err) = table_builder(&schema, &ShapefileOptions::default()) else {
            panic!("long field name was accepted");
        };
        match err {
            WriteError::FieldCreateFailed { name, .. } => assert_eq!(name, "a_very_long_name"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_table_builder_rejects_duplicates() {
        let schema = schema(&[("name", FieldType::Text), ("NAME", FieldType::Text)]);
        let Err(err) = table_builder(&schema, &ShapefileOptions::default()) else {
            panic!("duplicate field name was accepted");
        };
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_attributes_cover_schema() {
        let schema = schema(&[("id", FieldType::Integer), ("name", FieldType::Text)]);
        let attributes =
            attributes(&schema, &record(&["1", "alpha"]), &ShapefileOptions::default()).unwrap();
        assert_eq!(attributes.get("id"), Some(&FieldValue::Numeric(Some(1.0))));
        assert_eq!(
            attributes.get("name"),
            Some(&FieldValue::Character(Some("alpha".to_string())))
        );
    }
}
