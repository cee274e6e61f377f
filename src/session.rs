//! One user's session: loaded tables are cached and every page is a method.

use std::{path::{Path, PathBuf}, sync::Arc, time::Instant};

use ahash::AHashMap;
use anyhow::{ensure, Result};

use crate::{
    access::{combine, compute_curves, group_label, title_label, Comparison, CumulativeSharePoint, CurveSet, CURVE_TITLE},
    cache::SessionCache,
    classify::{compute_bins, BinReference, ColorScale, PalmaScale, DEFAULT_CLASSES, NO_ACCESS},
    common,
    config::DataConfig,
    equity::{prepare_palma, DegeneratePolicy, PalmaValue, INFINITE_RATIO_FILL, ZERO_RATIO_FILL},
    map::{Choropleth, ChoroplethFeature, FeatureLayer, LegendItem, Viewport, ZOOM_PALMA},
    outcome::Outcome,
    selection::{AccessSelection, Area, CurveComparison, CurveSelection, OpportunitySelection, PalmaSelection, FINLAND},
    table::{OpportunitySummary, OpportunityTable, PalmaTable, PopulationTable, TravelTimeTable},
    view::{AccessMap, PalmaView},
    vocab::{ColumnStyle, Mode},
};

const GRID_KEY: &str = "grid";
const MUNICIPALITIES_KEY: &str = "municipalities";

/// Data directory, configuration and the tables loaded so far.
pub struct Session {
    dir: PathBuf,
    config: DataConfig,
    layers: SessionCache<FeatureLayer>,
    travel_times: SessionCache<TravelTimeTable>,
    population: SessionCache<PopulationTable>,
    palma: SessionCache<PalmaTable>,
    opportunities: SessionCache<OpportunityTable>,
}

impl Session {
    /// Open `dir`, reading its manifest when it has one.
    pub fn open(dir: &Path) -> Result<Self> {
        common::require_dir_exists(dir)?;
        let config = DataConfig::load_or_default(dir)?;
        Ok(Self::with_config(dir, config))
    }

    pub fn with_config(dir: &Path, config: DataConfig) -> Self {
        Self {
            dir: dir.to_path_buf(),
            config,
            layers: SessionCache::new(),
            travel_times: SessionCache::new(),
            population: SessionCache::new(),
            palma: SessionCache::new(),
            opportunities: SessionCache::new(),
        }
    }

    pub fn config(&self) -> &DataConfig { &self.config }

    pub fn data_dir(&self) -> &Path { &self.dir }

    fn path(&self, file: &Path) -> PathBuf { self.dir.join(file) }

    fn grid(&mut self) -> Result<Arc<FeatureLayer>> {
        let path = self.path(&self.config.files.grid);
        let crs = self.config.source_crs.clone();
        let municipality = self.config.columns.grid_municipality.clone();
        self.layers.get_or_try_insert_with(GRID_KEY, || {
            let start = Instant::now();
            log::info!("[session] loading grid from {}", path.display());
            let layer = FeatureLayer::read(&path, crs.as_deref())?;
            ensure!(layer.has_column(&municipality),
                "[session] Grid {} has no {:?} column", path.display(), municipality);
            log::info!("[session] loaded {} grid cells in {:.2} seconds", layer.len(), start.elapsed().as_secs_f64());
            Ok(layer)
        })
    }

    /// Grid cells of `area`; municipality subsets are cached per area.
    fn area_grid(&mut self, area: &Area) -> Result<Arc<FeatureLayer>> {
        let grid = self.grid()?;
        let Area::Municipality(name) = area else { return Ok(grid) };
        let column = self.config.columns.grid_municipality.clone();
        self.layers.get_or_try_insert_with(&area.cache_key(), || {
            let mask = grid.text_column(&column)?.iter()
                .map(|m| m.as_deref() == Some(name.as_str()))
                .collect::<Vec<_>>();
            grid.filter(&mask)
        })
    }

    fn municipality_polygons(&mut self) -> Result<Arc<FeatureLayer>> {
        let path = self.path(&self.config.files.municipalities);
        let crs = self.config.source_crs.clone();
        self.layers.get_or_try_insert_with(MUNICIPALITIES_KEY, || {
            let layer = FeatureLayer::read(&path, crs.as_deref())?;
            log::info!("[session] loaded {} municipality polygons", layer.len());
            Ok(layer)
        })
    }

    fn travel_time_table(&mut self, mode: Mode) -> Result<Arc<TravelTimeTable>> {
        let path = self.path(self.config.files.travel_times(mode));
        let columns = &self.config.columns;
        self.travel_times.get_or_try_insert_with(mode.abbrev(), || {
            let start = Instant::now();
            let table = TravelTimeTable::read(&path, mode, columns)?;
            log::info!("[session] loaded {} {} travel times in {:.2} seconds",
                table.len(), mode, start.elapsed().as_secs_f64());
            Ok(table)
        })
    }

    fn population_table(&mut self) -> Result<Arc<PopulationTable>> {
        let path = self.path(&self.config.files.population);
        let columns = &self.config.columns;
        self.population.get_or_try_insert_with("population", || {
            let table = PopulationTable::read(&path, columns)?;
            log::info!("[session] loaded population of {} origins", table.len());
            Ok(table)
        })
    }

    fn palma_table(&mut self) -> Result<Arc<PalmaTable>> {
        let path = self.path(&self.config.files.palma);
        let columns = &self.config.columns;
        self.palma.get_or_try_insert_with("palma", || PalmaTable::read(&path, columns))
    }

    fn opportunity_table(&mut self) -> Result<Arc<OpportunityTable>> {
        let path = self.path(&self.config.files.opportunities);
        let columns = &self.config.columns;
        let crs = self.config.source_crs.as_deref();
        self.opportunities.get_or_try_insert_with("opportunities", || OpportunityTable::read(&path, columns, crs))
    }

    /// Area choices of the access map: "Finland", then every municipality of the grid.
    pub fn area_options(&mut self) -> Result<Vec<String>> {
        let grid = self.grid()?;
        let names = grid.text_column(&self.config.columns.grid_municipality)?;
        let mut options = vec![FINLAND.to_string()];
        options.extend(crate::table::unique_sorted(names.iter().flatten().map(String::as_str))
            .into_iter()
            .filter(|name| name != FINLAND));
        Ok(options)
    }

    /// Municipalities offered on the cumulative curve page.
    pub fn curve_municipalities(&mut self) -> Result<Vec<String>> {
        Ok(self.travel_time_table(Mode::Cycling)?.municipalities())
    }

    fn curve_points(&mut self, selection: &CurveSelection, group: &str) -> Result<Outcome<Vec<CumulativeSharePoint>>> {
        let population = self.population_table()?.subset(&selection.municipalities);
        let mut times = Vec::new();
        for mode in self.config.vocabulary.modes.clone() {
            times.push((mode, self.travel_time_table(mode)?.subset(&selection.municipalities)));
        }
        let modes = times.iter().map(|(mode, t)| (*mode, t)).collect::<Vec<_>>();
        Ok(compute_curves(&modes, &population, selection.max_minutes, group))
    }

    /// Cumulative share of the school-age population reaching the nearest
    /// educational facility, per mode, for one municipality selection.
    pub fn cumulative_curves(&mut self, selection: &CurveSelection) -> Result<Outcome<CurveSet>> {
        let group = group_label(&selection.municipalities);
        let points = self.curve_points(selection, &group)?;
        Ok(points.map(|points| CurveSet {
            title: format!("{} in {}", CURVE_TITLE, title_label(&selection.municipalities)),
            comparison: None,
            points,
        }))
    }

    /// Curves of two municipality selections on one chart.
    pub fn compare_curves(&mut self, comparison: &CurveComparison) -> Result<Outcome<CurveSet>> {
        let (first, second) = match comparison.resolve().into_ready() {
            Ok(selections) => selections,
            Err(pending) => return Ok(pending),
        };
        let kind = Comparison::of(&first.municipalities, &second.municipalities);

        let first_points = match self.curve_points(&first, &group_label(&first.municipalities))?.into_ready() {
            Ok(points) => points,
            Err(pending) => return Ok(pending),
        };
        let second_points = if kind == Comparison::Identical {
            Vec::new()
        } else {
            match self.curve_points(&second, &group_label(&second.municipalities))?.into_ready() {
                Ok(points) => points,
                Err(pending) => return Ok(pending),
            }
        };

        Ok(Outcome::Ready(CurveSet {
            title: CURVE_TITLE.to_string(),
            comparison: Some(kind),
            points: combine(kind, first_points, second_points),
        }))
    }

    /// Choropleth of the number of opportunities reachable from each grid cell.
    pub fn access_map(&mut self, selection: &AccessSelection) -> Result<Outcome<AccessMap>> {
        let query = match selection.resolve(&self.config.vocabulary)?.into_ready() {
            Ok(query) => query,
            Err(pending) => return Ok(pending),
        };
        let grid = self.area_grid(&query.area)?;
        if grid.is_empty() {
            return Ok(Outcome::no_data(format!("no grid cells in {}", query.area)));
        }

        let column = query.key.name(ColumnStyle::Access);
        ensure!(grid.has_column(&column), "[session] Grid has no access column {:?}", column);
        let values = grid.numeric_column(&column)?
            .into_iter()
            .map(|v| v.unwrap_or(0.0))
            .collect::<Vec<_>>();

        let reference_cutoff = self.config.vocabulary.reference_cutoff().filter(|_| query.shared_bins);
        let bins = match reference_cutoff {
            Some(cutoff) => {
                let reference_column = query.key.with_cutoff(cutoff).name(ColumnStyle::Access);
                let reference = grid.numeric_column(&reference_column)?
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>();
                compute_bins(&values, BinReference::Shared(&reference), DEFAULT_CLASSES)
            }
            None => compute_bins(&values, BinReference::Own, DEFAULT_CLASSES),
        };
        let scale = ColorScale::access(bins.max());

        let reachable = values.iter().map(|v| *v > 0.0).collect::<Vec<_>>();
        let (shown, legend) = if reachable.iter().any(|r| *r) && !bins.is_degenerate() {
            (grid.filter(&reachable)?, LegendItem::from_bins(&bins, &scale))
        } else {
            log::debug!("[session] nothing reachable for {} in {}", column, query.area);
            ((*grid).clone(), vec![LegendItem::new("No access", NO_ACCESS)])
        };

        let shown_values = shown.numeric_column(&column)?;
        let names = shown.text_column(&self.config.columns.grid_municipality)?;
        let features = shown.geoms().iter()
            .zip(shown_values)
            .zip(names)
            .map(|((geometry, value), name)| {
                let value = value.unwrap_or(0.0);
                ChoroplethFeature {
                    geometry: geometry.clone(),
                    name: name.unwrap_or_default(),
                    value: Some(value),
                    category: None,
                    fill: scale.color(value),
                }
            })
            .collect::<Vec<_>>();
        log::info!("[session] access map {} for {}: {} cells", column, query.area, features.len());

        let choropleth = Choropleth {
            title: format!("Number of accessible {}", query.opportunity_label.to_lowercase()),
            value_label: column.clone(),
            features,
            legend,
            viewport: Viewport::for_area(&shown, &query.area),
        };
        Ok(Outcome::Ready(AccessMap { query, column, bins, scale, choropleth }))
    }

    /// Palma ratio ranking and municipality map for one combination.
    pub fn palma(
        &mut self,
        selection: &PalmaSelection,
        policy: DegeneratePolicy,
        scale: PalmaScale,
    ) -> Result<Outcome<PalmaView>> {
        let query = match selection.resolve(&self.config.vocabulary)?.into_ready() {
            Ok(query) => query,
            Err(pending) => return Ok(pending),
        };
        let table = self.palma_table()?;
        let presentation = match prepare_palma(table.records(), &query.key, policy, scale).into_ready() {
            Ok(presentation) => presentation,
            Err(pending) => return Ok(pending),
        };

        let mut by_name: AHashMap<&str, PalmaValue> = AHashMap::new();
        for row in &presentation.ranked {
            by_name.insert(&row.municipality, PalmaValue::Ratio(row.ratio));
        }
        for row in &presentation.flagged {
            by_name.insert(&row.municipality, row.value);
        }

        let polygons = self.municipality_polygons()?;
        let names = polygons.text_column(&self.config.columns.palma_name)?;
        let mut mask = Vec::with_capacity(polygons.len());
        let mut features = Vec::new();
        for (geometry, name) in polygons.geoms().iter().zip(&names) {
            let joined = name.as_deref()
                .and_then(|n| by_name.get(n).map(|value| (n, *value)))
                .and_then(|(n, value)| presentation.fill(value).map(|fill| (n, value, fill)));
            mask.push(joined.is_some());
            let Some((name, value, fill)) = joined else { continue };
            features.push(ChoroplethFeature {
                geometry: geometry.clone(),
                name: name.to_string(),
                value: value.ratio(),
                category: value.is_degenerate().then(|| value.to_string()),
                fill,
            });
        }
        let unmatched = by_name.len().saturating_sub(features.len());
        if unmatched > 0 {
            log::warn!("[session] {} municipalities with Palma ratios have no polygon", unmatched);
        }

        let mut legend = LegendItem::from_stops(&presentation.scale);
        if presentation.flagged.iter().any(|r| r.value == PalmaValue::Zero) {
            legend.push(LegendItem::new(PalmaValue::Zero.to_string(), ZERO_RATIO_FILL));
        }
        if presentation.flagged.iter().any(|r| r.value == PalmaValue::Infinite) {
            legend.push(LegendItem::new(PalmaValue::Infinite.to_string(), INFINITE_RATIO_FILL));
        }

        let shown = polygons.filter(&mask)?;
        let choropleth = Choropleth {
            title: format!("Palma ratio of access to {}: {}, {} min",
                query.opportunity_label.to_lowercase(), query.key.mode, query.key.cutoff),
            value_label: presentation.column(),
            features,
            legend,
            viewport: Viewport::fit(&shown, ZOOM_PALMA),
        };
        Ok(Outcome::Ready(PalmaView { query, presentation, choropleth }))
    }

    /// Opportunity types offered on the spatial distribution page.
    pub fn opportunity_types(&mut self) -> Result<Vec<String>> {
        Ok(self.opportunity_table()?.types())
    }

    /// Area choices of the spatial distribution page.
    pub fn opportunity_areas(&mut self) -> Result<Vec<String>> {
        let mut options = vec![FINLAND.to_string()];
        options.extend(self.opportunity_table()?.municipalities());
        Ok(options)
    }

    /// Count and locate the opportunities of the selected types.
    pub fn opportunities(&mut self, selection: &OpportunitySelection) -> Result<Outcome<OpportunitySummary>> {
        let (types, area) = match selection.resolve().into_ready() {
            Ok(resolved) => resolved,
            Err(pending) => return Ok(pending),
        };
        self.opportunity_table()?.summarize(&types, &area)
    }
}
