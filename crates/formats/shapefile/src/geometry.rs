//! Geometry conversion from X/Y tokens and WKT into Shapefile shapes.

use std::fmt;

use csv2shp_core_common::{GeometryShape, SourcePosition};
use geo_types::{Coord, Geometry, LineString, Polygon};
use geozero::ToGeo;
use geozero::wkt::Wkt;
use shapefile::{Multipoint, Point, PolygonRing, Polyline};

use crate::error::{Result, WriteError};

/// Shape type of a Shapefile layer.
///
/// Shapefiles have no separate single/multi line or polygon types, so
/// `LineString` and `MultiLineString` both land in a polyline layer and
/// `Polygon` and `MultiPolygon` both land in a polygon layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerShape {
    Point,
    Polyline,
    Polygon,
    Multipoint,
}

impl From<GeometryShape> for LayerShape {
    fn from(shape: GeometryShape) -> Self {
        match shape {
            GeometryShape::Point => LayerShape::Point,
            GeometryShape::LineString | GeometryShape::MultiLineString => LayerShape::Polyline,
            GeometryShape::Polygon | GeometryShape::MultiPolygon => LayerShape::Polygon,
            GeometryShape::MultiPoint => LayerShape::Multipoint,
        }
    }
}

impl fmt::Display for LayerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerShape::Point => "Point",
            LayerShape::Polyline => "Polyline",
            LayerShape::Polygon => "Polygon",
            LayerShape::Multipoint => "Multipoint",
        };
        f.write_str(name)
    }
}

/// A geometry ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureShape {
    Point(Point),
    Polyline(Polyline),
    Polygon(shapefile::Polygon),
    Multipoint(Multipoint),
}

impl FeatureShape {
    #[must_use]
    pub fn layer_shape(&self) -> LayerShape {
        match self {
            FeatureShape::Point(_) => LayerShape::Point,
            FeatureShape::Polyline(_) => LayerShape::Polyline,
            FeatureShape::Polygon(_) => LayerShape::Polygon,
            FeatureShape::Multipoint(_) => LayerShape::Multipoint,
        }
    }
}

/// Parses a coordinate token.
///
/// # Errors
///
/// Returns [`WriteError::NumericParseFailed`] if the token is missing or not
/// a floating-point literal.
pub fn parse_coordinate(token: Option<&str>, axis: &str, position: SourcePosition) -> Result<f64> {
    let value = token.unwrap_or_default();
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| WriteError::NumericParseFailed {
            field: axis.to_string(),
            value: value.to_string(),
            position,
        })
}

/// Builds a point from X and Y tokens.
///
/// # Errors
///
/// Returns [`WriteError::NumericParseFailed`] if either token is not numeric.
pub fn point_from_xy(
    x: Option<&str>,
    y: Option<&str>,
    position: SourcePosition,
) -> Result<FeatureShape> {
    let x = parse_coordinate(x, "X", position)?;
    let y = parse_coordinate(y, "Y", position)?;
    Ok(FeatureShape::Point(Point::new(x, y)))
}

/// Parses a WKT value and converts it into a shape for a `layer` layer.
///
/// # Errors
///
/// Returns [`WriteError::MalformedGeometry`] if the WKT cannot be parsed,
/// has too few vertices, or does not fit the layer's shape type.
pub fn shape_from_wkt(
    wkt: &str,
    layer: LayerShape,
    position: SourcePosition,
) -> Result<FeatureShape> {
    let malformed = |reason: String| WriteError::MalformedGeometry { position, reason };

    let wkt = wkt.trim();
    if wkt.is_empty() {
        return Err(malformed("empty WKT value".to_string()));
    }

    let geometry = Wkt(wkt)
        .to_geo()
        .map_err(|err| malformed(format!("invalid WKT: {err}")))?;
    let shape = shape_from_geometry(geometry).map_err(malformed)?;

    if shape.layer_shape() == layer {
        Ok(shape)
    } else {
        Err(malformed(format!(
            "expected a {layer} geometry, found {}",
            shape.layer_shape()
        )))
    }
}

fn shape_from_geometry(geometry: Geometry<f64>) -> std::result::Result<FeatureShape, String> {
    match geometry {
        Geometry::Point(point) => Ok(FeatureShape::Point(Point::new(point.x(), point.y()))),
        Geometry::MultiPoint(points) => {
            if points.0.is_empty() {
                return Err("empty multipoint".to_string());
            }
            let points = points.0.iter().map(|p| Point::new(p.x(), p.y())).collect();
            Ok(FeatureShape::Multipoint(Multipoint::new(points)))
        },
        Geometry::LineString(line) => {
            let part = polyline_part(&line)?;
            Ok(FeatureShape::Polyline(Polyline::new(part)))
        },
        Geometry::MultiLineString(lines) => {
            if lines.0.is_empty() {
                return Err("empty multilinestring".to_string());
            }
            let parts = lines
                .0
                .iter()
                .map(polyline_part)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(FeatureShape::Polyline(Polyline::with_parts(parts)))
        },
        Geometry::Polygon(polygon) => {
            let rings = polygon_rings(&polygon)?;
            Ok(FeatureShape::Polygon(shapefile::Polygon::with_rings(rings)))
        },
        Geometry::MultiPolygon(polygons) => {
            if polygons.0.is_empty() {
                return Err("empty multipolygon".to_string());
            }
            let mut rings = Vec::new();
            for polygon in &polygons.0 {
                rings.extend(polygon_rings(polygon)?);
            }
            Ok(FeatureShape::Polygon(shapefile::Polygon::with_rings(rings)))
        },
        other => Err(format!("unsupported geometry {}", geometry_name(&other))),
    }
}

fn points(line: &LineString<f64>) -> Vec<Point> {
    line.0
        .iter()
        .map(|Coord { x, y }| Point::new(*x, *y))
        .collect()
}

fn polyline_part(line: &LineString<f64>) -> std::result::Result<Vec<Point>, String> {
    if line.0.len() < 2 {
        return Err(format!(
            "linestring needs at least 2 points, found {}",
            line.0.len()
        ));
    }
    Ok(points(line))
}

fn polygon_rings(polygon: &Polygon<f64>) -> std::result::Result<Vec<PolygonRing<Point>>, String> {
    let ring = |line: &LineString<f64>| {
        if line.0.len() < 4 {
            Err(format!(
                "polygon ring needs at least 4 points, found {}",
                line.0.len()
            ))
        } else {
            Ok(points(line))
        }
    };

    let mut rings = vec![PolygonRing::Outer(ring(polygon.exterior())?)];
    for interior in polygon.interiors() {
        rings.push(PolygonRing::Inner(ring(interior)?));
    }
    Ok(rings)
}

fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
