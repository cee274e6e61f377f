use serde::Serialize;

use crate::{map::FeatureLayer, selection::Area};

/// Zoom level for the whole country.
pub const ZOOM_FINLAND: u8 = 7;
/// Zoom level for a single municipality.
pub const ZOOM_MUNICIPALITY: u8 = 10;
/// Zoom level of the municipality-level Palma map.
pub const ZOOM_PALMA: u8 = 5;
/// Opportunity point maps open wider than the grid maps.
pub const ZOOM_POINTS_FINLAND: u8 = 5;
pub const ZOOM_POINTS_MUNICIPALITY: u8 = 9;

/// Initial map position for a rendering frontend.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Viewport {
    pub lat: f64,
    pub lon: f64,
    pub zoom: u8,
}

impl Viewport {
    /// Centered on the centroid of `layer`; `None` for an empty layer.
    pub fn fit(layer: &FeatureLayer, zoom: u8) -> Option<Self> {
        layer.centroid().map(|c| Self { lat: c.y(), lon: c.x(), zoom })
    }

    pub fn for_area(layer: &FeatureLayer, area: &Area) -> Option<Self> {
        let zoom = match area {
            Area::Finland => ZOOM_FINLAND,
            Area::Municipality(_) => ZOOM_MUNICIPALITY,
        };
        Self::fit(layer, zoom)
    }

    pub fn for_points(layer: &FeatureLayer, area: &Area) -> Option<Self> {
        let zoom = match area {
            Area::Finland => ZOOM_POINTS_FINLAND,
            Area::Municipality(_) => ZOOM_POINTS_MUNICIPALITY,
        };
        Self::fit(layer, zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{point, Geometry};
    use polars::frame::DataFrame;

    #[test]
    fn zoom_follows_area() {
        let layer = FeatureLayer::new(
            vec![Geometry::Point(point!(x: 24.0, y: 60.0)), Geometry::Point(point!(x: 26.0, y: 62.0))],
            DataFrame::empty(),
        ).unwrap();
        let finland = Viewport::for_area(&layer, &Area::Finland).unwrap();
        assert_eq!((finland.lon, finland.lat, finland.zoom), (25.0, 61.0, ZOOM_FINLAND));
        let espoo = Viewport::for_area(&layer, &Area::Municipality("Espoo".into())).unwrap();
        assert_eq!(espoo.zoom, ZOOM_MUNICIPALITY);
        assert_eq!(Viewport::for_points(&layer, &Area::Finland).unwrap().zoom, ZOOM_POINTS_FINLAND);
    }
}
