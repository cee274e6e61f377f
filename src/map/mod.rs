mod choropleth;
mod layer;
mod viewport;

pub use choropleth::{Choropleth, ChoroplethFeature, LegendItem};
pub use layer::FeatureLayer;
pub use viewport::{
    Viewport, ZOOM_FINLAND, ZOOM_MUNICIPALITY, ZOOM_PALMA, ZOOM_POINTS_FINLAND, ZOOM_POINTS_MUNICIPALITY,
};
