use std::{collections::HashMap, path::Path};

use ahash::RandomState;
use anyhow::{Context, Result};
use polars::frame::DataFrame;

use crate::{config::Columns, io, vocab::Mode};

/// Per-origin values keyed by origin id.
pub type OriginValues = HashMap<String, f64, RandomState>;

struct Origin {
    id: String,
    municipality: String,
    value: Option<f64>,
}

fn in_selection(municipality: &str, municipalities: &[String]) -> bool {
    municipalities.is_empty() || municipalities.iter().any(|m| m == municipality)
}

fn origin_keys(df: &DataFrame, columns: &Columns) -> Result<(Vec<Option<String>>, Vec<Option<String>>)> {
    Ok((
        io::str_values(df, &columns.origin_id)?,
        io::str_values(df, &columns.origin_municipality)?,
    ))
}

/// Travel time from each origin to its nearest facility by one mode.
pub struct TravelTimeTable {
    mode: Mode,
    origins: Vec<Origin>,
}

impl TravelTimeTable {
    /// Rows without an origin id are dropped; a missing travel time is kept
    /// as unreachable.
    pub fn from_frame(df: &DataFrame, mode: Mode, columns: &Columns) -> Result<Self> {
        let (ids, municipalities) = origin_keys(df, columns)
            .context("[table::origin] Travel-time table does not match the column contract")?;
        let times = io::f64_values(df, &columns.travel_time)
            .context("[table::origin] Travel-time table does not match the column contract")?;

        let origins = ids.into_iter()
            .zip(municipalities)
            .zip(times)
            .filter_map(|((id, municipality), value)| Some(Origin {
                id: id?,
                municipality: municipality.unwrap_or_default(),
                value,
            }))
            .collect::<Vec<_>>();
        if origins.len() < df.height() {
            log::warn!("[table::origin] dropped {} {} rows without an origin id", df.height() - origins.len(), mode);
        }
        Ok(Self { mode, origins })
    }

    pub fn read(path: &Path, mode: Mode, columns: &Columns) -> Result<Self> {
        let df = io::read_csv(path)?;
        Self::from_frame(&df, mode, columns)
            .with_context(|| format!("[table::origin] Invalid travel-time table {}", path.display()))
    }

    pub fn mode(&self) -> Mode { self.mode }

    pub fn len(&self) -> usize { self.origins.len() }

    pub fn is_empty(&self) -> bool { self.origins.is_empty() }

    pub fn municipalities(&self) -> Vec<String> {
        super::unique_sorted(self.origins.iter().map(|o| o.municipality.as_str()))
    }

    /// Travel times of the origins in `municipalities` (all origins for an
    /// empty list). An origin listed twice keeps its shortest time.
    pub fn subset(&self, municipalities: &[String]) -> OriginValues {
        let mut out = OriginValues::default();
        for origin in self.origins.iter().filter(|o| in_selection(&o.municipality, municipalities)) {
            let Some(time) = origin.value else { continue };
            out.entry(origin.id.clone())
                .and_modify(|t: &mut f64| *t = t.min(time))
                .or_insert(time);
        }
        out
    }
}

/// Population of each origin, summed over the configured age bands.
pub struct PopulationTable {
    origins: Vec<Origin>,
}

impl PopulationTable {
    /// Negative counts in any band are clamped to zero before summing;
    /// missing counts add nothing.
    pub fn from_frame(df: &DataFrame, columns: &Columns) -> Result<Self> {
        let (ids, municipalities) = origin_keys(df, columns)
            .context("[table::origin] Population table does not match the column contract")?;

        let mut totals = vec![0.0; df.height()];
        for band in &columns.age_bands {
            let counts = io::f64_values(df, band)
                .with_context(|| format!("[table::origin] Population table lacks age band {:?}", band))?;
            for (total, count) in totals.iter_mut().zip(counts) {
                *total += count.filter(|c| !c.is_nan()).unwrap_or(0.0).max(0.0);
            }
        }

        let origins = ids.into_iter()
            .zip(municipalities)
            .zip(totals)
            .filter_map(|((id, municipality), total)| Some(Origin {
                id: id?,
                municipality: municipality.unwrap_or_default(),
                value: Some(total),
            }))
            .collect();
        Ok(Self { origins })
    }

    pub fn read(path: &Path, columns: &Columns) -> Result<Self> {
        let df = io::read_csv(path)?;
        Self::from_frame(&df, columns)
            .with_context(|| format!("[table::origin] Invalid population table {}", path.display()))
    }

    pub fn len(&self) -> usize { self.origins.len() }

    pub fn is_empty(&self) -> bool { self.origins.is_empty() }

    /// Population of the origins in `municipalities` (all origins for an
    /// empty list). Counts of an origin listed twice are added.
    pub fn subset(&self, municipalities: &[String]) -> OriginValues {
        let mut out = OriginValues::default();
        for origin in self.origins.iter().filter(|o| in_selection(&o.municipality, municipalities)) {
            *out.entry(origin.id.clone()).or_insert(0.0) += origin.value.unwrap_or(0.0);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    fn travel_times() -> DataFrame {
        DataFrame::new(vec![
            Column::new("id".into(), ["a", "b", "c", "a"]),
            Column::new("nimi".into(), ["Espoo", "Espoo", "Oulu", "Espoo"]),
            Column::new("trv__50".into(), [Some(12.0), None, Some(30.0), Some(8.0)]),
        ]).unwrap()
    }

    fn population() -> DataFrame {
        DataFrame::new(vec![
            Column::new("id".into(), ["a", "b", "c"]),
            Column::new("nimi".into(), ["Espoo", "Espoo", "Oulu"]),
            Column::new("he_7_12".into(), [10.0, -5.0, 3.0]),
            Column::new("he_13_15".into(), [Some(5.0), Some(2.0), None]),
            Column::new("he_16_17".into(), [1.0, 1.0, 1.0]),
        ]).unwrap()
    }

    #[test]
    fn travel_times_by_municipality() {
        let table = TravelTimeTable::from_frame(&travel_times(), Mode::Transit, &Columns::default()).unwrap();
        assert_eq!(table.municipalities(), vec!["Espoo".to_string(), "Oulu".to_string()]);

        let espoo = table.subset(&["Espoo".to_string()]);
        assert_eq!(espoo.len(), 1);
        assert_eq!(espoo["a"], 8.0);
        assert_eq!(table.subset(&[]).len(), 2);
    }

    #[test]
    fn population_bands_are_clamped_and_summed() {
        let table = PopulationTable::from_frame(&population(), &Columns::default()).unwrap();
        let all = table.subset(&[]);
        assert_eq!(all["a"], 16.0);
        assert_eq!(all["b"], 3.0);
        assert_eq!(all["c"], 4.0);
        assert_eq!(table.subset(&["Oulu".to_string()]).len(), 1);
    }

    #[test]
    fn missing_age_band_is_fatal() {
        let mut columns = Columns::default();
        columns.age_bands.push("he_18_24".into());
        assert!(PopulationTable::from_frame(&population(), &columns).is_err());
    }

    #[test]
    fn late_na_travel_time_is_unreachable() {
        let mut csv = String::from("id,nimi,trv__50\n");
        for i in 0..200 {
            csv.push_str(&format!("o{},Espoo,{}\n", i, 5 + i % 40));
        }
        csv.push_str("late,Espoo,NA\n");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access_ttm_pt.csv");
        std::fs::write(&path, csv).unwrap();

        let table = TravelTimeTable::read(&path, Mode::Transit, &Columns::default()).unwrap();
        assert_eq!(table.len(), 201);
        let times = table.subset(&[]);
        assert_eq!(times.len(), 200);
        assert!(!times.contains_key("late"));
    }

    #[test]
    fn na_population_counts_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");
        std::fs::write(&path, "id,nimi,he_7_12,he_13_15,he_16_17\na,Espoo,4,NA,1\nb,Espoo,NA,NA,NA\n").unwrap();

        let table = PopulationTable::read(&path, &Columns::default()).unwrap();
        let all = table.subset(&[]);
        assert_eq!(all["a"], 5.0);
        assert_eq!(all["b"], 0.0);
    }
}
