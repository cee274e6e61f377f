use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use geo::{Centroid, Geometry, GeometryCollection, Point};
use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};

use crate::{common, io};

/// Geometries with one attribute row per geometry.
#[derive(Clone, Debug)]
pub struct FeatureLayer {
    geoms: Vec<Geometry<f64>>,
    data: DataFrame,
}

impl FeatureLayer {
    /// An attribute table without columns is accepted for any number of geometries.
    pub fn new(geoms: Vec<Geometry<f64>>, data: DataFrame) -> Result<Self> {
        ensure!(data.width() == 0 || data.height() == geoms.len(),
            "[map::layer] {} attribute rows for {} geometries", data.height(), geoms.len());
        Ok(Self { geoms, data })
    }

    /// Read a GeoJSON or shapefile layer, reprojecting from `source_crs` when given.
    pub fn read(path: &Path, source_crs: Option<&str>) -> Result<Self> {
        common::require_file_exists(path)?;
        let extension = path.extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let (mut geoms, data) = match extension.as_str() {
            "geojson" | "json" => io::geojson::read_geojson(path)?,
            "shp" => io::shp::read_shapefile(path)?,
            other => bail!("[map::layer] Unsupported geometry format {:?} for {}", other, path.display()),
        };
        if let Some(crs) = source_crs {
            io::proj::reproject_to_wgs84(&mut geoms, crs)
                .with_context(|| format!("[map::layer] Failed to reproject {}", path.display()))?;
        }
        Self::new(geoms, data)
    }

    pub fn len(&self) -> usize { self.geoms.len() }

    pub fn is_empty(&self) -> bool { self.geoms.is_empty() }

    pub fn geoms(&self) -> &[Geometry<f64>] { &self.geoms }

    pub fn data(&self) -> &DataFrame { &self.data }

    pub fn has_column(&self, name: &str) -> bool { io::has_column(&self.data, name) }

    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        io::f64_values(&self.data, name)
    }

    pub fn text_column(&self, name: &str) -> Result<Vec<Option<String>>> {
        io::str_values(&self.data, name)
    }

    /// Keep the features whose `mask` entry is true.
    pub fn filter(&self, mask: &[bool]) -> Result<Self> {
        ensure!(mask.len() == self.len(),
            "[map::layer] Mask of length {} for {} features", mask.len(), self.len());
        let geoms = self.geoms.iter()
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(geometry, _)| geometry.clone())
            .collect();
        let data = if self.data.width() == 0 {
            self.data.clone()
        } else {
            self.data.filter(&BooleanChunked::from_slice("mask".into(), mask))
                .context("[map::layer] Failed to filter attribute rows")?
        };
        Ok(Self { geoms, data })
    }

    /// Centroid of all features taken together.
    pub fn centroid(&self) -> Option<Point<f64>> {
        GeometryCollection(self.geoms.clone()).centroid()
    }
}
