//! Data manifest: where the upstream files live, which columns they carry
//! and the selection vocabulary.

use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::vocab::{Mode, Vocabulary};

/// File name of the manifest looked up by [`DataConfig::load_or_default`].
pub const MANIFEST_FILE: &str = "accessatlas.json";

/// Input files, relative to the data directory. Geometry files may be
/// GeoJSON (`.geojson`/`.json`) or shapefiles (`.shp`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFiles {
    /// Grid cells with cumulative access columns.
    pub grid: PathBuf,
    /// Per-origin travel time to the nearest educational facility, by public transport.
    pub travel_times_transit: PathBuf,
    /// Per-origin travel time to the nearest educational facility, by bicycle.
    pub travel_times_cycling: PathBuf,
    /// Per-origin population by age band.
    pub population: PathBuf,
    /// Palma ratios per municipality.
    pub palma: PathBuf,
    /// Municipality polygons.
    pub municipalities: PathBuf,
    /// Opportunity locations.
    pub opportunities: PathBuf,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            grid: "grid_access.geojson".into(),
            travel_times_transit: "access_ttm_pt.csv".into(),
            travel_times_cycling: "access_ttm_cycling.csv".into(),
            population: "grid.csv".into(),
            palma: "palma.csv".into(),
            municipalities: "kunnat2023.geojson".into(),
            opportunities: "merged_opportunities.geojson".into(),
        }
    }
}

impl DataFiles {
    pub fn travel_times(&self, mode: Mode) -> &Path {
        match mode {
            Mode::Transit => &self.travel_times_transit,
            Mode::Cycling => &self.travel_times_cycling,
        }
    }
}

/// Column names agreed with the upstream accessibility pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Columns {
    /// Municipality of a grid cell or opportunity.
    pub grid_municipality: String,
    /// Municipality of a travel-time or population row.
    pub origin_municipality: String,
    /// Origin identifier shared by the travel-time and population tables.
    pub origin_id: String,
    pub travel_time: String,
    /// Population counts summed into the curve denominator.
    pub age_bands: Vec<String>,
    /// Municipality identifier in the Palma table.
    pub palma_id: String,
    /// Municipality name in the Palma table and the municipality polygons.
    pub palma_name: String,
    pub opportunity_type: String,
    pub opportunity_name: String,
    pub opportunity_color: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            grid_municipality: "mncplty".into(),
            origin_municipality: "nimi".into(),
            origin_id: "id".into(),
            travel_time: "trv__50".into(),
            age_bands: vec!["he_7_12".into(), "he_13_15".into(), "he_16_17".into()],
            palma_id: "kunta".into(),
            palma_name: "nimi".into(),
            opportunity_type: "opprtnt".into(),
            opportunity_name: "name".into(),
            opportunity_color: "color".into(),
        }
    }
}

/// Everything a [`crate::Session`] needs to find and interpret its data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub files: DataFiles,
    pub columns: Columns,
    pub vocabulary: Vocabulary,
    /// Proj string of the source geometries; `None` when they already are
    /// WGS84 longitude/latitude.
    pub source_crs: Option<String>,
}

impl DataConfig {
    /// Read a JSON manifest; missing fields take their defaults.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("[config] Failed to read manifest {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("[config] Failed to parse manifest {}", path.display()))
    }

    /// Write this configuration as pretty JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("[config] Failed to serialize manifest")?;
        fs::write(path, text)
            .with_context(|| format!("[config] Failed to write manifest {}", path.display()))
    }

    /// Use `<dir>/accessatlas.json` when present, the defaults otherwise.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        if path.is_file() {
            log::info!("[config] reading manifest {}", path.display());
            Self::read(&path)
        } else {
            log::debug!("[config] no manifest in {}, using defaults", dir.display());
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_upstream_names() {
        let config = DataConfig::default();
        assert_eq!(config.files.travel_times(Mode::Transit), Path::new("access_ttm_pt.csv"));
        assert_eq!(config.columns.travel_time, "trv__50");
        assert_eq!(config.columns.age_bands.len(), 3);
        assert!(config.source_crs.is_none());
    }

    #[test]
    fn partial_manifest_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{ "files": { "palma": "ratios.csv" }, "source_crs": "+proj=utm +zone=35 +ellps=GRS80 +units=m +no_defs" }"#,
        ).unwrap();

        let config = DataConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.files.palma, PathBuf::from("ratios.csv"));
        assert_eq!(config.files.population, PathBuf::from("grid.csv"));
        assert_eq!(config.columns, Columns::default());
        assert!(config.source_crs.is_some());
    }

    #[test]
    fn missing_manifest_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(DataConfig::load_or_default(dir.path()).unwrap(), DataConfig::default());
    }

    #[test]
    fn manifest_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let mut config = DataConfig::default();
        config.columns.origin_id = "cell".into();
        config.write(&path).unwrap();
        assert_eq!(DataConfig::read(&path).unwrap(), config);
        assert!(DataConfig::read(&dir.path().join("nope.json")).is_err());
    }
}
