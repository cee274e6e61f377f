//! Reprojection of source geometries to WGS84 longitude/latitude.

use std::cell::RefCell;

use anyhow::{anyhow, Error, Result};
use geo::{Coord, Geometry, MapCoordsInPlace};
use proj4rs::{transform::transform, Proj};

/// ETRS89 / TM35FIN, the projection of the upstream Finnish grids.
pub const ETRS_TM35FIN: &str = "+proj=utm +zone=35 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs";

const WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Transform projected geometries (given by a proj string) to degrees in WGS84.
pub(crate) fn reproject_to_wgs84(geoms: &mut [Geometry<f64>], source: &str) -> Result<()> {
    let src = Proj::from_proj_string(source)
        .map_err(|e| anyhow!("[io::proj] Invalid source projection {:?}: {:?}", source, e))?;
    let dst = Proj::from_proj_string(WGS84)
        .map_err(|e| anyhow!("[io::proj] Invalid WGS84 projection: {:?}", e))?;

    // First failure wins; the coordinate it failed on is left as is.
    let failure: RefCell<Option<Error>> = RefCell::new(None);
    let to_wgs84 = |c: Coord<f64>| -> Coord<f64> {
        let mut point = (c.x, c.y, 0.0);
        match transform(&src, &dst, &mut point) {
            Ok(()) => Coord { x: point.0.to_degrees(), y: point.1.to_degrees() },
            Err(e) => {
                let mut slot = failure.borrow_mut();
                if slot.is_none() {
                    *slot = Some(anyhow!("[io::proj] Failed to reproject ({}, {}): {:?}", c.x, c.y, e));
                }
                c
            }
        }
    };

    for geometry in geoms.iter_mut() {
        geometry.map_coords_in_place(to_wgs84);
    }
    if let Some(err) = failure.into_inner() {
        return Err(err);
    }
    log::debug!("[io::proj] reprojected {} geometries to WGS84", geoms.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{point, polygon};

    #[test]
    fn tm35fin_central_meridian() {
        // 500 000 m easting lies on the 27°E central meridian.
        let mut geoms = vec![Geometry::Point(point!(x: 500_000.0, y: 6_651_411.0))];
        reproject_to_wgs84(&mut geoms, ETRS_TM35FIN).unwrap();
        let Geometry::Point(p) = geoms[0] else { panic!("expected a point") };
        assert!((p.x() - 27.0).abs() < 1e-6);
        assert!((p.y() - 60.0).abs() < 0.01);
    }

    #[test]
    fn polygons_are_reprojected_vertex_by_vertex() {
        let mut geoms = vec![Geometry::Polygon(polygon![
            (x: 500_000.0, y: 6_651_411.0),
            (x: 501_000.0, y: 6_651_411.0),
            (x: 501_000.0, y: 6_652_411.0),
        ])];
        reproject_to_wgs84(&mut geoms, ETRS_TM35FIN).unwrap();
        let Geometry::Polygon(polygon) = &geoms[0] else { panic!("expected a polygon") };
        assert!(polygon.exterior().coords().all(|c| (c.x - 27.0).abs() < 0.05 && (c.y - 60.0).abs() < 0.05));
        assert!(polygon.exterior().0[1].x > polygon.exterior().0[0].x);
    }

    #[test]
    fn invalid_projection_is_an_error() {
        let mut geoms = vec![Geometry::Point(point!(x: 0.0, y: 0.0))];
        assert!(reproject_to_wgs84(&mut geoms, "+proj=nonsense").is_err());
    }
}
