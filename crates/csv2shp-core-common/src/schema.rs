//! Data model shared by the reader and the writer.
//!
//! A conversion run infers a [`Schema`] and a [`ResolvedGeometry`] once from
//! the header and the first data row, then streams transient [`Record`]s
//! through the writer. None of these values change after inference.

use std::fmt;

use crate::position::SourcePosition;

/// Storage class of an attribute column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Optional sign followed by decimal digits.
    Integer,
    /// Anything else that parses fully as a floating-point literal.
    Real,
    /// Everything else.
    Text,
}

impl FieldType {
    /// Classifies a single token.
    ///
    /// Empty tokens and tokens that do not start with a digit or a sign are
    /// always [`FieldType::Text`].
    ///
    /// ```
    /// use csv2shp_core_common::FieldType;
    ///
    /// assert_eq!(FieldType::classify("-42"), FieldType::Integer);
    /// assert_eq!(FieldType::classify("10.5"), FieldType::Real);
    /// assert_eq!(FieldType::classify(".5"), FieldType::Text);
    /// assert_eq!(FieldType::classify("alpha"), FieldType::Text);
    /// ```
    #[must_use]
    pub fn classify(token: &str) -> Self {
        match token.chars().next() {
            Some(first) if first.is_ascii_digit() || first == '+' || first == '-' => {},
            _ => return FieldType::Text,
        }

        if is_integer_literal(token) {
            FieldType::Integer
        } else if token.parse::<f64>().is_ok() {
            FieldType::Real
        } else {
            FieldType::Text
        }
    }

    /// Returns the display name of the type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Integer => "Integer",
            FieldType::Real => "Real",
            FieldType::Text => "Text",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns `true` if `token` matches `^[+-]?[0-9]+$`.
#[must_use]
pub fn is_integer_literal(token: &str) -> bool {
    let digits = token.strip_prefix(&['+', '-'][..]).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// One attribute column of the output layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    /// Field name, taken from the header or synthesized as `FieldN`.
    pub name: String,
    /// Type inferred from the sample row.
    pub field_type: FieldType,
    /// 0-based index of the input column feeding this field.
    pub column_index: usize,
}

impl SchemaField {
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType, column_index: usize) -> Self {
        Self {
            name: name.into(),
            field_type,
            column_index,
        }
    }
}

/// Ordered attribute schema, excluding the geometry source column(s).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<SchemaField>,
}

impl Schema {
    #[must_use]
    pub fn new(fields: Vec<SchemaField>) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaField> {
        self.fields.iter()
    }
}

/// Geometry shapes recognized in WKT mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryShape {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

impl GeometryShape {
    pub const ALL: [GeometryShape; 6] = [
        GeometryShape::Point,
        GeometryShape::LineString,
        GeometryShape::Polygon,
        GeometryShape::MultiPoint,
        GeometryShape::MultiLineString,
        GeometryShape::MultiPolygon,
    ];

    /// The WKT keyword for this shape, in upper case.
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            GeometryShape::Point => "POINT",
            GeometryShape::LineString => "LINESTRING",
            GeometryShape::Polygon => "POLYGON",
            GeometryShape::MultiPoint => "MULTIPOINT",
            GeometryShape::MultiLineString => "MULTILINESTRING",
            GeometryShape::MultiPolygon => "MULTIPOLYGON",
        }
    }

    /// Parses a WKT keyword, ignoring ASCII case.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.keyword().eq_ignore_ascii_case(keyword))
    }

    /// Returns the leading keyword of a WKT string: everything before the
    /// first whitespace or opening parenthesis.
    ///
    /// ```
    /// use csv2shp_core_common::GeometryShape;
    ///
    /// assert_eq!(GeometryShape::leading_keyword("POINT (1 2)"), "POINT");
    /// assert_eq!(GeometryShape::leading_keyword("  LINESTRING(0 0, 1 1)"), "LINESTRING");
    /// ```
    #[must_use]
    pub fn leading_keyword(wkt: &str) -> &str {
        let wkt = wkt.trim_start();
        let end = wkt
            .find(|c: char| c.is_whitespace() || c == '(')
            .unwrap_or(wkt.len());
        &wkt[..end]
    }

    /// Infers the shape of a WKT string from its leading keyword.
    #[must_use]
    pub fn from_wkt(wkt: &str) -> Option<Self> {
        Self::from_keyword(Self::leading_keyword(wkt))
    }
}

impl fmt::Display for GeometryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeometryShape::Point => "Point",
            GeometryShape::LineString => "LineString",
            GeometryShape::Polygon => "Polygon",
            GeometryShape::MultiPoint => "MultiPoint",
            GeometryShape::MultiLineString => "MultiLineString",
            GeometryShape::MultiPolygon => "MultiPolygon",
        };
        f.write_str(name)
    }
}

/// A configured column reference: a header name or a 0-based index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef(String);

impl ColumnRef {
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The reference as a positional index, if it consists solely of
    /// decimal digits.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        if !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit()) {
            self.0.parse().ok()
        } else {
            None
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<usize> for ColumnRef {
    fn from(value: usize) -> Self {
        Self::new(value.to_string())
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Requested geometry representation, before it is resolved against a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryMode {
    /// Point features built from two numeric columns.
    Xy { x: ColumnRef, y: ColumnRef },
    /// Features parsed from a well-known-text column.
    Wkt { geometry: ColumnRef },
}

impl GeometryMode {
    #[must_use]
    pub fn xy(x: impl Into<ColumnRef>, y: impl Into<ColumnRef>) -> Self {
        GeometryMode::Xy {
            x: x.into(),
            y: y.into(),
        }
    }

    #[must_use]
    pub fn wkt(geometry: impl Into<ColumnRef>) -> Self {
        GeometryMode::Wkt {
            geometry: geometry.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            GeometryMode::Xy { .. } => "xy",
            GeometryMode::Wkt { .. } => "wkt",
        }
    }
}

/// Geometry representation resolved against a concrete header and sample row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedGeometry {
    Xy { x_index: usize, y_index: usize },
    Wkt { index: usize, shape: GeometryShape },
}

impl ResolvedGeometry {
    /// Shape of every feature written for this geometry.
    #[must_use]
    pub fn shape(&self) -> GeometryShape {
        match self {
            ResolvedGeometry::Xy { .. } => GeometryShape::Point,
            ResolvedGeometry::Wkt { shape, .. } => *shape,
        }
    }

    /// Returns `true` if the column feeds the geometry rather than an attribute.
    #[must_use]
    pub fn is_source_column(&self, index: usize) -> bool {
        match self {
            ResolvedGeometry::Xy { x_index, y_index } => index == *x_index || index == *y_index,
            ResolvedGeometry::Wkt { index: geom, .. } => index == *geom,
        }
    }
}

/// Raw tokens of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    line: u64,
    tokens: Vec<String>,
}

impl Record {
    #[must_use]
    pub fn new(line: u64, tokens: Vec<String>) -> Self {
        Self { line, tokens }
    }

    /// Token at the given 0-based column, if the line was long enough.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// 1-based line number in the source file.
    #[must_use]
    pub fn line(&self) -> u64 {
        self.line
    }

    #[must_use]
    pub fn position(&self) -> SourcePosition {
        SourcePosition::line(self.line)
    }
}
