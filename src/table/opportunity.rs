use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame};
use serde::Serialize;

use crate::{
    classify::{Rgb, NO_ACCESS},
    common,
    config::Columns,
    io,
    map::{Choropleth, ChoroplethFeature, FeatureLayer, LegendItem, Viewport},
    outcome::Outcome,
    selection::Area,
};

/// Number of opportunities of one type in the selected area.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OpportunityCount {
    pub opportunity_type: String,
    pub color: Rgb,
    pub count: usize,
}

/// Bar-chart table and point layer of the spatial distribution page.
#[derive(Clone, Debug)]
pub struct OpportunitySummary {
    pub area: Area,
    pub counts: Vec<OpportunityCount>,
    pub points: Choropleth,
}

impl OpportunitySummary {
    pub fn title(&self) -> String {
        format!("Number of opportunities in {}", self.area)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }

    /// Columns `Opportunity type`, `count`, `color`.
    pub fn to_frame(&self) -> Result<DataFrame> {
        DataFrame::new(vec![
            Column::new("Opportunity type".into(), self.counts.iter().map(|c| c.opportunity_type.as_str()).collect::<Vec<_>>()),
            Column::new("count".into(), self.counts.iter().map(|c| c.count as u64).collect::<Vec<_>>()),
            Column::new("color".into(), self.counts.iter().map(|c| c.color.to_string()).collect::<Vec<_>>()),
        ]).context("[table::opportunity] Failed to build count table")
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        common::ensure_parent_exists(path)?;
        io::write_csv(&mut self.to_frame()?, path)
    }
}

/// Opportunity locations with their type, municipality, name and color.
pub struct OpportunityTable {
    layer: FeatureLayer,
    types: Vec<String>,
    municipalities: Vec<String>,
    names: Vec<String>,
    colors: Vec<Rgb>,
}

impl OpportunityTable {
    pub fn from_layer(layer: FeatureLayer, columns: &Columns) -> Result<Self> {
        let text = |name: &str| -> Result<Vec<String>> {
            Ok(layer.text_column(name)
                .with_context(|| format!("[table::opportunity] Opportunity layer lacks column {:?}", name))?
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect())
        };
        let types = text(&columns.opportunity_type)?;
        let municipalities = text(&columns.grid_municipality)?;
        let names = if layer.has_column(&columns.opportunity_name) {
            text(&columns.opportunity_name)?
        } else {
            types.clone()
        };

        let mut invalid = 0;
        let colors = if layer.has_column(&columns.opportunity_color) {
            text(&columns.opportunity_color)?.iter()
                .map(|hex| Rgb::from_hex(hex).unwrap_or_else(|_| { invalid += 1; NO_ACCESS }))
                .collect()
        } else {
            vec![NO_ACCESS; layer.len()]
        };
        if invalid > 0 {
            log::warn!("[table::opportunity] {} opportunities have no valid color", invalid);
        }

        Ok(Self { layer, types, municipalities, names, colors })
    }

    pub fn read(path: &Path, columns: &Columns, source_crs: Option<&str>) -> Result<Self> {
        let layer = FeatureLayer::read(path, source_crs)?;
        log::info!("[table::opportunity] loaded {} opportunities from {}", layer.len(), path.display());
        Self::from_layer(layer, columns)
    }

    pub fn len(&self) -> usize { self.layer.len() }

    pub fn is_empty(&self) -> bool { self.layer.is_empty() }

    /// Opportunity types offered for selection.
    pub fn types(&self) -> Vec<String> {
        super::unique_sorted(self.types.iter().map(String::as_str))
    }

    pub fn municipalities(&self) -> Vec<String> {
        super::unique_sorted(self.municipalities.iter().map(String::as_str))
    }

    /// Count the opportunities of `types` within `area`, grouped by type and color.
    pub fn summarize(&self, types: &[String], area: &Area) -> Result<Outcome<OpportunitySummary>> {
        let mask = self.types.iter()
            .zip(&self.municipalities)
            .map(|(t, m)| area.contains(m) && types.contains(t))
            .collect::<Vec<_>>();
        let selected = mask.iter().enumerate()
            .filter(|(_, keep)| **keep)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        if selected.is_empty() {
            return Ok(Outcome::no_data(format!("no {} in {}", types.join(", "), area)));
        }

        let mut counts: Vec<OpportunityCount> = Vec::new();
        for &i in &selected {
            match counts.iter_mut().find(|c| c.opportunity_type == self.types[i] && c.color == self.colors[i]) {
                Some(count) => count.count += 1,
                None => counts.push(OpportunityCount {
                    opportunity_type: self.types[i].clone(),
                    color: self.colors[i],
                    count: 1,
                }),
            }
        }
        counts.sort_by(|a, b| a.opportunity_type.cmp(&b.opportunity_type)
            .then_with(|| a.color.to_string().cmp(&b.color.to_string())));

        let filtered = self.layer.filter(&mask)?;
        let features = filtered.geoms().iter()
            .zip(&selected)
            .map(|(geometry, &i)| ChoroplethFeature {
                geometry: geometry.clone(),
                name: self.names[i].clone(),
                value: None,
                category: Some(self.types[i].clone()),
                fill: self.colors[i],
            })
            .collect();
        let legend = counts.iter()
            .map(|c| LegendItem::new(format!("{} ({})", c.opportunity_type, c.count), c.color))
            .collect();

        let summary = OpportunitySummary {
            area: area.clone(),
            counts,
            points: Choropleth {
                title: format!("Number of opportunities in {}", area),
                value_label: "count".into(),
                features,
                legend,
                viewport: Viewport::for_points(&filtered, area),
            },
        };
        log::debug!("[table::opportunity] {} opportunities selected in {}", summary.total(), area);
        Ok(Outcome::Ready(summary))
    }
}
