//! Results of the map pages, ready to hand to a renderer.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame};

use crate::{
    classify::{ClassificationBins, ColorScale},
    common,
    equity::PalmaPresentation,
    io,
    map::Choropleth,
    selection::{AccessQuery, PalmaQuery},
};

/// Cumulative access map of one area, mode, opportunity and cutoff.
#[derive(Clone, Debug)]
pub struct AccessMap {
    pub query: AccessQuery,
    /// Access column shown, e.g. `JL_aptk30`.
    pub column: String,
    pub bins: ClassificationBins,
    pub scale: ColorScale,
    pub choropleth: Choropleth,
}

impl AccessMap {
    /// Grid cells drawn on the map.
    pub fn cells(&self) -> usize { self.choropleth.features.len() }
}

/// Palma ratio ranking and municipality map.
#[derive(Clone, Debug)]
pub struct PalmaView {
    pub query: PalmaQuery,
    pub presentation: PalmaPresentation,
    pub choropleth: Choropleth,
}

impl PalmaView {
    /// Columns `rank`, `Kunta`, `Palma ratio`, highest ratio first.
    pub fn ranking_frame(&self) -> Result<DataFrame> {
        let ranked = &self.presentation.ranked;
        DataFrame::new(vec![
            Column::new("rank".into(), ranked.iter().map(|r| r.rank as u64).collect::<Vec<_>>()),
            Column::new("Kunta".into(), ranked.iter().map(|r| r.municipality.as_str()).collect::<Vec<_>>()),
            Column::new("Palma ratio".into(), ranked.iter().map(|r| r.ratio).collect::<Vec<_>>()),
        ]).context("[view] Failed to build Palma ranking table")
    }

    /// Columns `Kunta`, `category` for the zero and infinite ratios.
    pub fn flagged_frame(&self) -> Result<DataFrame> {
        let flagged = &self.presentation.flagged;
        DataFrame::new(vec![
            Column::new("Kunta".into(), flagged.iter().map(|r| r.municipality.as_str()).collect::<Vec<_>>()),
            Column::new("category".into(), flagged.iter().map(|r| r.value.to_string()).collect::<Vec<_>>()),
        ]).context("[view] Failed to build flagged Palma table")
    }

    pub fn write_ranking_csv(&self, path: &Path) -> Result<()> {
        common::ensure_parent_exists(path)?;
        io::write_csv(&mut self.ranking_frame()?, path)?;
        log::info!("[view] wrote {} ranked municipalities to {}", self.presentation.ranked.len(), path.display());
        Ok(())
    }

    pub fn write_flagged_csv(&self, path: &Path) -> Result<()> {
        common::ensure_parent_exists(path)?;
        io::write_csv(&mut self.flagged_frame()?, path)
    }
}
