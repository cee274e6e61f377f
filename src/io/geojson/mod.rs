//! GeoJSON feature collections: geometries plus a property table.

mod read;
mod write;

pub(crate) use read::*;
pub(crate) use write::*;
