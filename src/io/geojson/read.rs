use std::{fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, Geometry, LineString, MultiPoint, MultiPolygon, Point, Polygon};
use polars::frame::DataFrame;
use serde_json::Value;

use crate::io::frame::{AttrValue, AttributeBuilder};

/// Read a GeoJSON FeatureCollection into geometries and an attribute table
/// with one row per feature. Features without geometry are skipped.
pub(crate) fn read_geojson(path: &Path) -> Result<(Vec<Geometry<f64>>, DataFrame)> {
    let bytes = fs::read(path)
        .with_context(|| format!("[io::geojson::read] Failed to read {}", path.display()))?;
    read_geojson_bytes(&bytes)
        .with_context(|| format!("[io::geojson::read] Invalid GeoJSON in {}", path.display()))
}

/// Parse GeoJSON bytes; see [`read_geojson`].
pub(crate) fn read_geojson_bytes(bytes: &[u8]) -> Result<(Vec<Geometry<f64>>, DataFrame)> {
    let value: Value = serde_json::from_slice(bytes).context("[io::geojson::read] Failed to parse JSON")?;
    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("[io::geojson::read] Expected a FeatureCollection with a features array"))?;

    let mut geoms = Vec::with_capacity(features.len());
    let mut attributes = AttributeBuilder::new();
    let mut skipped = 0;
    for feature in features {
        let Some(geometry) = feature.get("geometry").filter(|g| !g.is_null()) else {
            skipped += 1;
            continue;
        };
        geoms.push(parse_geometry(geometry)?);

        let properties = feature["properties"].as_object();
        attributes.push_row(properties.into_iter().flatten()
            .map(|(name, value)| (name.clone(), attr_value(value))));
    }
    if skipped > 0 {
        log::warn!("[io::geojson] skipped {} features without geometry", skipped);
    }

    Ok((geoms, attributes.finish()?))
}

fn attr_value(value: &Value) -> AttrValue {
    match value {
        Value::Null => AttrValue::Null,
        Value::Number(n) => n.as_f64().map_or(AttrValue::Null, AttrValue::Number),
        Value::Bool(b) => AttrValue::Number(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => AttrValue::Text(s.clone()),
        other => AttrValue::Text(other.to_string()),
    }
}

fn parse_geometry(geometry: &Value) -> Result<Geometry<f64>> {
    let kind = geometry["type"].as_str()
        .ok_or_else(|| anyhow!("[io::geojson::read] Geometry without a type"))?;
    let coords = &geometry["coordinates"];
    Ok(match kind {
        "Point" => Geometry::Point(Point::from(parse_coord(coords)?)),
        "MultiPoint" => Geometry::MultiPoint(MultiPoint(
            as_array(coords)?.iter()
                .map(|c| parse_coord(c).map(Point::from))
                .collect::<Result<_>>()?,
        )),
        "Polygon" => Geometry::Polygon(parse_polygon(coords)?),
        "MultiPolygon" => Geometry::MultiPolygon(MultiPolygon(
            as_array(coords)?.iter().map(parse_polygon).collect::<Result<_>>()?,
        )),
        other => bail!("[io::geojson::read] Unsupported geometry type {:?}", other),
    })
}

/// `[exterior, hole, hole, ...]`
fn parse_polygon(coords: &Value) -> Result<Polygon<f64>> {
    let mut rings = as_array(coords)?.iter().map(parse_ring);
    let exterior = rings.next()
        .ok_or_else(|| anyhow!("[io::geojson::read] Polygon without an exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn parse_ring(coords: &Value) -> Result<LineString<f64>> {
    let mut points = as_array(coords)?.iter().map(parse_coord).collect::<Result<Vec<_>>>()?;
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }
    Ok(LineString(points))
}

fn parse_coord(value: &Value) -> Result<Coord<f64>> {
    let pair = as_array(value)?;
    let (Some(x), Some(y)) = (pair.first().and_then(Value::as_f64), pair.get(1).and_then(Value::as_f64)) else {
        bail!("[io::geojson::read] Invalid coordinate {}", value);
    };
    Ok(Coord { x, y })
}

fn as_array(value: &Value) -> Result<&Vec<Value>> {
    value.as_array().ok_or_else(|| anyhow!("[io::geojson::read] Expected an array, found {}", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::frame::{f64_values, str_values};

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"nimi": "Espoo", "JL_aptk30": 12},
             "geometry": {"type": "Polygon", "coordinates": [[[24.6, 60.1], [24.8, 60.1], [24.8, 60.3], [24.6, 60.3]]]}},
            {"type": "Feature", "properties": {"nimi": "Oulu"},
             "geometry": {"type": "Point", "coordinates": [25.47, 65.01]}},
            {"type": "Feature", "properties": {"nimi": "Nowhere"}, "geometry": null}
        ]
    }"#;

    #[test]
    fn reads_geometries_and_properties() {
        let (geoms, df) = read_geojson_bytes(SAMPLE.as_bytes()).unwrap();
        assert_eq!(geoms.len(), 2);
        assert_eq!(df.height(), 2);

        let Geometry::Polygon(polygon) = &geoms[0] else { panic!("expected a polygon") };
        assert_eq!(polygon.exterior().0.len(), 5);
        assert!(matches!(geoms[1], Geometry::Point(_)));

        assert_eq!(str_values(&df, "nimi").unwrap(), vec![Some("Espoo".into()), Some("Oulu".into())]);
        assert_eq!(f64_values(&df, "JL_aptk30").unwrap(), vec![Some(12.0), None]);
    }

    #[test]
    fn rejects_non_collections() {
        assert!(read_geojson_bytes(br#"{"type": "Feature"}"#).is_err());
        let bad = r#"{"features": [{"geometry": {"type": "LineString", "coordinates": []}, "properties": {}}]}"#;
        assert!(read_geojson_bytes(bad.as_bytes()).is_err());
    }
}
