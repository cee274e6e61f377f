//! IO module for format-specific reading and writing operations.
//!
//! Operations are organized by format type rather than domain:
//!
//! - `csv` - CSV format for origin, population and Palma tables
//! - `frame` - typed column access and attribute-table construction
//! - `geojson` - GeoJSON feature collections (grid cells, polygons, points)
//! - `shp` - Shapefile format for geographic data
//! - `proj` - reprojection of source coordinates to WGS84
//! - `svg` - SVG format for choropleth export

pub(crate) mod csv;
pub(crate) mod frame;
pub(crate) mod geojson;
pub(crate) mod proj;
pub(crate) mod shp;
pub(crate) mod svg;

pub(crate) use csv::*;
pub(crate) use frame::*;
