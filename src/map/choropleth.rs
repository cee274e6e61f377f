use std::path::Path;

use anyhow::Result;
use geo::Geometry;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::{
    classify::{ClassificationBins, ColorScale, Rgb},
    common,
    io::{self, svg::{LegendEntry, SvgFeature}},
    map::Viewport,
};

const SVG_WIDTH: f64 = 1200.0;
const SVG_MARGIN: f64 = 10.0;

/// One colored feature of a choropleth.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoroplethFeature {
    pub geometry: Geometry<f64>,
    pub name: String,
    /// Value behind the color; `None` for flagged categories.
    pub value: Option<f64>,
    /// Category shown instead of a value.
    pub category: Option<String>,
    pub fill: Rgb,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LegendItem {
    pub label: String,
    pub color: Rgb,
}

impl LegendItem {
    pub fn new(label: impl Into<String>, color: Rgb) -> Self {
        Self { label: label.into(), color }
    }

    /// One item per class, colored at the class midpoint.
    pub fn from_bins(bins: &ClassificationBins, scale: &ColorScale) -> Vec<Self> {
        bins.boundaries().windows(2)
            .map(|w| Self::new(format!("{} - {}", format_value(w[0]), format_value(w[1])), scale.color((w[0] + w[1]) / 2.0)))
            .collect()
    }

    /// One item per color stop.
    pub fn from_stops(scale: &ColorScale) -> Vec<Self> {
        scale.stops().iter()
            .map(|(value, color)| Self::new(format_value(*value), *color))
            .collect()
    }
}

/// Geometries annotated with one value and a fill color, ready for a map
/// frontend (GeoJSON) or as a static image (SVG).
#[derive(Clone, Debug, PartialEq)]
pub struct Choropleth {
    pub title: String,
    /// Attribute name under which values are written.
    pub value_label: String,
    pub features: Vec<ChoroplethFeature>,
    pub legend: Vec<LegendItem>,
    pub viewport: Option<Viewport>,
}

impl Choropleth {
    /// FeatureCollection whose features carry `name`, `value`, `fillColor`
    /// and `category` properties; title, legend and viewport are stored as
    /// foreign members of the collection.
    pub fn to_geojson(&self) -> Value {
        let mut collection = io::geojson::feature_collection(self.features.iter().map(|feature| {
            let mut properties = Map::new();
            properties.insert("name".into(), json!(feature.name));
            properties.insert(self.value_label.clone(), json!(feature.value.filter(|v| v.is_finite())));
            properties.insert("fillColor".into(), json!(feature.fill.to_string()));
            properties.insert("category".into(), json!(feature.category));
            (&feature.geometry, properties)
        }));
        collection["title"] = json!(self.title);
        collection["legend"] = json!(self.legend);
        collection["viewport"] = json!(self.viewport);
        collection
    }

    pub fn write_geojson(&self, path: &Path) -> Result<()> {
        common::ensure_parent_exists(path)?;
        io::geojson::write_geojson(&self.to_geojson(), path)?;
        log::info!("[map::choropleth] wrote {} features to {}", self.features.len(), path.display());
        Ok(())
    }

    pub fn to_svg(&self) -> Result<String> {
        let mut writer = io::svg::SvgStringWriter::new();
        self.render_svg(&mut writer)?;
        writer.into_string()
    }

    pub fn write_svg(&self, path: &Path) -> Result<()> {
        common::ensure_parent_exists(path)?;
        let mut writer = io::svg::SvgWriter::new(path)?;
        self.render_svg(&mut writer)?;
        writer.finish()?;
        log::info!("[map::choropleth] wrote SVG to {}", path.display());
        Ok(())
    }

    fn render_svg(&self, writer: &mut impl std::io::Write) -> Result<()> {
        let features = self.features.iter()
            .map(|feature| SvgFeature {
                geometry: &feature.geometry,
                fill: feature.fill,
                title: match (&feature.category, feature.value) {
                    (Some(category), _) => format!("{}: {}", feature.name, category),
                    (None, Some(value)) => format!("{}: {}", feature.name, format_value(value)),
                    (None, None) => feature.name.clone(),
                },
            })
            .collect::<Vec<_>>();
        let legend = self.legend.iter()
            .map(|item| LegendEntry { label: item.label.clone(), color: item.color })
            .collect::<Vec<_>>();
        io::svg::write_choropleth(writer, &features, &legend, SVG_WIDTH, SVG_MARGIN)
    }
}

/// Whole numbers without decimals, others with two.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 { format!("{value:.0}") } else { format!("{value:.2}") }
}
