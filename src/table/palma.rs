use std::path::Path;

use anyhow::{bail, Context, Result};
use polars::frame::DataFrame;

use crate::{
    config::Columns,
    equity::{PalmaRecord, PalmaValue},
    io,
    vocab::{ColumnKey, ColumnStyle},
};

/// Palma ratios of every municipality for every coded column of the table.
pub struct PalmaTable {
    records: Vec<PalmaRecord>,
    keys: Vec<ColumnKey>,
}

impl PalmaTable {
    /// Every column named like `{jl|pp}_{opportunity}_{cutoff}` becomes one
    /// record per municipality. Municipalities are identified by the id
    /// column when the table has one, by name otherwise.
    pub fn from_frame(df: &DataFrame, columns: &Columns) -> Result<Self> {
        let names = io::str_values(df, &columns.palma_name)
            .context("[table::palma] Palma table lacks the municipality name column")?;
        let ids = if io::has_column(df, &columns.palma_id) {
            io::str_values(df, &columns.palma_id)?
        } else {
            names.clone()
        };

        let mut records = Vec::new();
        let mut keys = Vec::new();
        for column in df.get_column_names() {
            let Some((key, ColumnStyle::Palma)) = ColumnKey::parse(column.as_str()) else { continue };
            let values = io::f64_values(df, column.as_str())?;
            for ((id, name), value) in ids.iter().zip(&names).zip(values) {
                let Some(name) = name else { continue };
                records.push(PalmaRecord {
                    municipality_id: id.clone()
                        .filter(|id| !id.trim().is_empty())
                        .unwrap_or_else(|| name.clone()),
                    municipality: name.clone(),
                    key: key.clone(),
                    value: PalmaValue::classify(value),
                });
            }
            keys.push(key);
        }
        if keys.is_empty() {
            bail!("[table::palma] Palma table has no mode/opportunity/cutoff columns");
        }
        Ok(Self { records, keys })
    }

    /// Numeric columns are read as text so that `inf` and `NaN` survive.
    pub fn read(path: &Path, columns: &Columns) -> Result<Self> {
        let df = io::read_csv_text(path)?;
        let table = Self::from_frame(&df, columns)
            .with_context(|| format!("[table::palma] Invalid Palma table {}", path.display()))?;
        log::info!("[table::palma] loaded {} ratios in {} columns", table.records.len(), table.keys.len());
        Ok(table)
    }

    pub fn records(&self) -> &[PalmaRecord] { &self.records }

    /// Combinations present in the table, in column order.
    pub fn keys(&self) -> &[ColumnKey] { &self.keys }
}
