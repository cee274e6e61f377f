use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{Context, Result};
use geo::{Coord, Geometry, LineString, Polygon};
use serde_json::{json, Map, Value};

/// GeoJSON geometry object, or `None` for geometry kinds that are not written.
pub(crate) fn geometry_to_value(geometry: &Geometry<f64>) -> Option<Value> {
    let value = match geometry {
        Geometry::Point(p) => json!({ "type": "Point", "coordinates": coord(&p.0) }),
        Geometry::MultiPoint(mp) => json!({
            "type": "MultiPoint",
            "coordinates": mp.0.iter().map(|p| coord(&p.0)).collect::<Vec<_>>(),
        }),
        Geometry::Polygon(polygon) => json!({ "type": "Polygon", "coordinates": polygon_coords(polygon) }),
        Geometry::MultiPolygon(mp) => json!({
            "type": "MultiPolygon",
            "coordinates": mp.0.iter().map(polygon_coords).collect::<Vec<_>>(),
        }),
        _ => return None,
    };
    Some(value)
}

/// Build a FeatureCollection from (geometry, properties) pairs.
pub(crate) fn feature_collection<'a>(features: impl IntoIterator<Item = (&'a Geometry<f64>, Map<String, Value>)>) -> Value {
    let features = features.into_iter()
        .filter_map(|(geometry, properties)| geometry_to_value(geometry).map(|geometry| json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": properties,
        })))
        .collect::<Vec<_>>();
    json!({ "type": "FeatureCollection", "features": features })
}

pub(crate) fn write_geojson(value: &Value, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[io::geojson::write] Failed to create {}", path.display()))?;
    serde_json::to_writer(BufWriter::new(file), value)
        .with_context(|| format!("[io::geojson::write] Failed to write GeoJSON to {}", path.display()))
}

fn coord(c: &Coord<f64>) -> [f64; 2] { [c.x, c.y] }

fn ring(ls: &LineString<f64>) -> Vec<[f64; 2]> { ls.coords().map(coord).collect() }

fn polygon_coords(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(ring)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::geojson::read_geojson_bytes;
    use geo::{point, polygon};

    #[test]
    fn collection_reads_back() {
        let geoms = vec![
            Geometry::Polygon(polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)]),
            Geometry::Point(point!(x: 2.0, y: 3.0)),
        ];
        let mut props = Map::new();
        props.insert("name".into(), json!("a"));
        let value = feature_collection(geoms.iter().map(|g| (g, props.clone())));

        assert_eq!(value["features"].as_array().unwrap().len(), 2);
        assert_eq!(value["features"][1]["geometry"]["coordinates"], json!([2.0, 3.0]));

        let (read, df) = read_geojson_bytes(&serde_json::to_vec(&value).unwrap()).unwrap();
        assert_eq!(read, geoms);
        assert_eq!(df.height(), 2);
    }
}
