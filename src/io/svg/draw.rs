//! Drawing filled geometries and a legend.

use std::io::Write;

use anyhow::{anyhow, Result};
use geo::{BoundingRect, Coord, CoordsIter, Geometry, LineString, Polygon, Rect};

use crate::classify::Rgb;

use super::{escape_xml, write_svg_footer, write_svg_header, write_svg_styles};

/// Projection function: lon/lat -> SVG coords (x,y)
type Projection = dyn Fn(&Coord<f64>) -> (f64, f64);

const LEGEND_ROW: f64 = 18.0;
const POINT_RADIUS: f64 = 3.0;

/// One geometry with its fill and hover title.
pub(crate) struct SvgFeature<'a> {
    pub(crate) geometry: &'a Geometry<f64>,
    pub(crate) fill: Rgb,
    pub(crate) title: String,
}

pub(crate) struct LegendEntry {
    pub(crate) label: String,
    pub(crate) color: Rgb,
}

/// Render features as a complete SVG document: map on top, legend below.
pub(crate) fn write_choropleth<W: Write>(
    writer: &mut W,
    features: &[SvgFeature],
    legend: &[LegendEntry],
    width: f64,
    margin: f64,
) -> Result<()> {
    let bounds = features_bounds(features)
        .ok_or_else(|| anyhow!("[io::svg] Could not determine bounds; nothing to draw."))?;

    let scale = (width - 2.0 * margin) / bounds.width();
    let map_height = bounds.height() * scale + 2.0 * margin;
    let height = map_height + legend.len() as f64 * LEGEND_ROW + if legend.is_empty() { 0.0 } else { margin };

    let project = move |coord: &Coord<f64>| -> (f64, f64) {
        let x = margin + (coord.x - bounds.min().x) * scale;
        let y = margin + (bounds.max().y - coord.y) * scale;
        (x, y)
    };

    write_svg_header(writer, width, height, &bounds)?;
    write_svg_styles(writer)?;
    for feature in features {
        draw_feature(writer, feature, &project)?;
    }
    draw_legend(writer, legend, margin, map_height)?;
    write_svg_footer(writer)
}

/// Bounds of all features, padded so single points still have an extent.
fn features_bounds(features: &[SvgFeature]) -> Option<Rect<f64>> {
    let rect = features.iter()
        .filter_map(|f| f.geometry.bounding_rect())
        .reduce(|a, b| Rect::new(
            Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
            Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
        ))?;
    let pad = 0.01 * rect.width().max(rect.height()).max(1.0);
    Some(Rect::new(
        Coord { x: rect.min().x - pad, y: rect.min().y - pad },
        Coord { x: rect.max().x + pad, y: rect.max().y + pad },
    ))
}

fn draw_feature(writer: &mut impl Write, feature: &SvgFeature, project: &Projection) -> Result<()> {
    let title = escape_xml(&feature.title);
    match feature.geometry {
        Geometry::Point(p) => draw_point(writer, &p.0, feature.fill, &title, project),
        Geometry::MultiPoint(mp) => mp.0.iter()
            .try_for_each(|p| draw_point(writer, &p.0, feature.fill, &title, project)),
        Geometry::Polygon(polygon) => draw_path(writer, &polygon_to_path(polygon, project), feature.fill, &title),
        Geometry::MultiPolygon(mp) => {
            let path = mp.0.iter().map(|p| polygon_to_path(p, project)).collect::<String>();
            draw_path(writer, &path, feature.fill, &title)
        }
        _ => Ok(()),
    }
}

fn draw_point(writer: &mut impl Write, coord: &Coord<f64>, fill: Rgb, title: &str, project: &Projection) -> Result<()> {
    let (x, y) = project(coord);
    writeln!(writer, r#"<circle class="site" cx="{x:.3}" cy="{y:.3}" r="{POINT_RADIUS}" style="fill:{fill}"><title>{title}</title></circle>"#)?;
    Ok(())
}

fn draw_path(writer: &mut impl Write, path: &str, fill: Rgb, title: &str) -> Result<()> {
    writeln!(writer, r#"<path class="area" fill-rule="evenodd" d="{path}" style="fill:{fill}"><title>{title}</title></path>"#)?;
    Ok(())
}

fn draw_legend(writer: &mut impl Write, legend: &[LegendEntry], margin: f64, top: f64) -> Result<()> {
    for (i, entry) in legend.iter().enumerate() {
        let y = top + i as f64 * LEGEND_ROW;
        writeln!(writer, r#"<rect x="{margin}" y="{y:.1}" width="14" height="14" style="fill:{}"/>"#, entry.color)?;
        writeln!(writer, r#"<text class="legend" x="{:.1}" y="{:.1}">{}</text>"#,
            margin + 20.0, y + 11.0, escape_xml(&entry.label))?;
    }
    Ok(())
}

/// Compact SVG path for a polygon (exterior + holes).
fn polygon_to_path(polygon: &Polygon<f64>, project: &Projection) -> String {
    let mut out = ring_to_path(polygon.exterior(), project);
    for interior in polygon.interiors() {
        out.push_str(&ring_to_path(interior, project));
    }
    out
}

fn ring_to_path(ring: &LineString<f64>, project: &Projection) -> String {
    let mut out = String::new();

    let mut coords = ring.coords_iter().map(|coord| project(&coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        out.push('Z');
    }

    out
}
