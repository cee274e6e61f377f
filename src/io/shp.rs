//! Shapefile reading: shapes become geo geometries, dBase records become
//! an attribute table.

use std::path::Path;

use anyhow::{Context, Result};
use geo::{Coord, Geometry, LineString, MultiPolygon, Point, Polygon};
use polars::frame::DataFrame;
use shapefile::{dbase::FieldValue, Reader, Shape};

use crate::io::frame::{AttrValue, AttributeBuilder};

/// Read the point and polygon shapes of a `.shp` file together with the
/// records of its `.dbf`. Other shape kinds are skipped with a warning.
pub(crate) fn read_shapefile(path: &Path) -> Result<(Vec<Geometry<f64>>, DataFrame)> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("[io::shp] Failed to open shapefile: {}", path.display()))?;

    let mut geoms = Vec::new();
    let mut attributes = AttributeBuilder::new();
    let mut skipped = 0;
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result
            .with_context(|| format!("[io::shp] Error reading shape+record from {}", path.display()))?;
        let geometry = match shape {
            Shape::Point(p) => Geometry::Point(Point::new(p.x, p.y)),
            Shape::Polygon(p) => Geometry::MultiPolygon(shp_to_geo(&p)),
            _ => {
                skipped += 1;
                continue;
            }
        };
        geoms.push(geometry);
        attributes.push_row(record.into_iter().map(|(name, value)| (name, field_value(value))));
    }
    if skipped > 0 {
        log::warn!("[io::shp] skipped {} shapes that are neither points nor polygons", skipped);
    }

    Ok((geoms, attributes.finish()?))
}

fn field_value(value: FieldValue) -> AttrValue {
    match value {
        FieldValue::Character(Some(s)) => AttrValue::Text(s.trim().to_string()),
        FieldValue::Numeric(Some(n)) => AttrValue::Number(n),
        FieldValue::Float(Some(n)) => AttrValue::Number(n as f64),
        FieldValue::Integer(n) => AttrValue::Number(n as f64),
        FieldValue::Double(n) => AttrValue::Number(n),
        _ => AttrValue::Null,
    }
}

/// Convert a shapefile polygon to a MultiPolygon. Clockwise rings are
/// exteriors; each is followed by its holes.
fn shp_to_geo(p: &shapefile::Polygon) -> MultiPolygon<f64> {
    let mut polys = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes = Vec::new();

    for ring in p.rings() {
        let mut coords = ring.points().iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect::<Vec<_>>();
        if !coords.is_empty() && coords[0] != coords[coords.len() - 1] {
            coords.push(coords[0]);
        }
        let is_exterior = signed_area(&coords) < 0.0;
        let ls = LineString(coords);

        if is_exterior {
            if let Some(ext) = exterior.take() {
                polys.push(Polygon::new(ext, std::mem::take(&mut holes)));
            }
            exterior = Some(ls);
        } else {
            holes.push(ls);
        }
    }
    if let Some(ext) = exterior {
        polys.push(Polygon::new(ext, holes));
    }

    MultiPolygon(polys)
}

/// Shoelace area; negative for clockwise rings.
fn signed_area(pts: &[Coord<f64>]) -> f64 {
    pts.windows(2).map(|w| w[0].x * w[1].y - w[1].x * w[0].y).sum::<f64>() / 2.0
}
