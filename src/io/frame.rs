//! Typed access to DataFrame columns, and DataFrame construction from
//! loosely typed feature attributes.

use ahash::AHashMap;
use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame, DataType};

/// Values of a numeric column. Text columns are parsed value by value, so
/// `inf`, `-inf` and `NaN` survive; empty or unparsable cells become `None`.
pub(crate) fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)
        .with_context(|| format!("[io::frame] Missing column {:?}", name))?;
    if column.dtype() == &DataType::String {
        let values = column.str()
            .with_context(|| format!("[io::frame] Column {:?} is not text", name))?;
        return Ok(values.into_iter()
            .map(|v| v.and_then(|s| s.trim().parse::<f64>().ok()))
            .collect());
    }
    let column = column.cast(&DataType::Float64)
        .with_context(|| format!("[io::frame] Column {:?} is not numeric", name))?;
    Ok(column.f64()?.into_iter().collect())
}

/// Values of a column as text, casting non-text columns.
pub(crate) fn str_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)
        .with_context(|| format!("[io::frame] Missing column {:?}", name))?;
    let column = if column.dtype() == &DataType::String {
        column.clone()
    } else {
        column.cast(&DataType::String)
            .with_context(|| format!("[io::frame] Column {:?} cannot be read as text", name))?
    };
    Ok(column.str()?.into_iter().map(|v| v.map(str::to_string)).collect())
}

/// Whether `df` has a column called `name`.
pub(crate) fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// One attribute value of a feature.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum AttrValue {
    Null,
    Number(f64),
    Text(String),
}

/// Collects per-feature attributes into columns. Attributes missing from a
/// feature become nulls.
#[derive(Default)]
pub(crate) struct AttributeBuilder {
    names: Vec<String>,
    index: AHashMap<String, usize>,
    columns: Vec<Vec<AttrValue>>,
    rows: usize,
}

impl AttributeBuilder {
    pub(crate) fn new() -> Self { Self::default() }

    pub(crate) fn push_row(&mut self, attributes: impl IntoIterator<Item = (String, AttrValue)>) {
        for (name, value) in attributes {
            let idx = match self.index.get(&name) {
                Some(&idx) => idx,
                None => {
                    let idx = self.names.len();
                    self.index.insert(name.clone(), idx);
                    self.names.push(name);
                    self.columns.push(vec![AttrValue::Null; self.rows]);
                    idx
                }
            };
            let column = &mut self.columns[idx];
            if column.len() == self.rows {
                column.push(value);
            }
        }
        self.rows += 1;
        for column in &mut self.columns {
            column.resize(self.rows, AttrValue::Null);
        }
    }

    /// Numeric columns become Int64 when every value is integral, Float64
    /// otherwise; anything with text becomes a String column.
    pub(crate) fn finish(self) -> Result<DataFrame> {
        if self.names.is_empty() { return Ok(DataFrame::empty()) }

        let columns = self.names.into_iter()
            .zip(self.columns)
            .map(|(name, values)| build_column(&name, values))
            .collect::<Vec<_>>();
        DataFrame::new(columns).context("[io::frame] Failed to assemble attribute table")
    }
}

fn build_column(name: &str, values: Vec<AttrValue>) -> Column {
    let numeric = values.iter().all(|v| !matches!(v, AttrValue::Text(_)));
    if numeric {
        let integral = values.iter().all(|v| match v {
            AttrValue::Number(x) => x.fract() == 0.0 && x.abs() < 9.0e15,
            _ => true,
        });
        if integral {
            let ints = values.iter()
                .map(|v| match v { AttrValue::Number(x) => Some(*x as i64), _ => None })
                .collect::<Vec<_>>();
            return Column::new(name.into(), ints);
        }
        let floats = values.iter()
            .map(|v| match v { AttrValue::Number(x) => Some(*x), _ => None })
            .collect::<Vec<_>>();
        return Column::new(name.into(), floats);
    }
    let text = values.into_iter()
        .map(|v| match v {
            AttrValue::Null => None,
            AttrValue::Number(x) => Some(x.to_string()),
            AttrValue::Text(s) => Some(s),
        })
        .collect::<Vec<_>>();
    Column::new(name.into(), text)
}
