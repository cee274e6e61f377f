use std::{cmp::Ordering, fmt};

use serde::Serialize;

use crate::{
    classify::{ColorScale, PalmaScale, Rgb},
    outcome::Outcome,
    vocab::{ColumnKey, ColumnStyle},
};

/// Fill for municipalities where the top income group reaches nothing.
pub const ZERO_RATIO_FILL: Rgb = Rgb::new(0xbd, 0xd7, 0xe7);
/// Fill for municipalities where the bottom 40% reach nothing.
pub const INFINITE_RATIO_FILL: Rgb = Rgb::new(0x40, 0x40, 0x40);

/// A Palma ratio as read from the upstream table.
///
/// Exact zero and infinity mean one income group reaches no opportunities at
/// all. They are categories, not magnitudes, and never enter rankings or
/// averages.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PalmaValue {
    Ratio(f64),
    Zero,
    Infinite,
    /// Null, NaN or negative: not enough data.
    Missing,
}

impl PalmaValue {
    pub fn classify(value: Option<f64>) -> Self {
        match value {
            None => PalmaValue::Missing,
            Some(v) if v.is_nan() || v < 0.0 => PalmaValue::Missing,
            Some(v) if v == 0.0 => PalmaValue::Zero,
            Some(v) if v.is_infinite() => PalmaValue::Infinite,
            Some(v) => PalmaValue::Ratio(v),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, PalmaValue::Zero | PalmaValue::Infinite)
    }

    pub fn ratio(&self) -> Option<f64> {
        match self {
            PalmaValue::Ratio(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for PalmaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PalmaValue::Ratio(v) => write!(f, "{:.2}", v),
            PalmaValue::Zero => f.write_str("no access for top 10%"),
            PalmaValue::Infinite => f.write_str("no access for bottom 40%"),
            PalmaValue::Missing => f.write_str("insufficient data"),
        }
    }
}

/// One municipality's ratio for one (mode, opportunity, cutoff) combination.
#[derive(Clone, Debug, PartialEq)]
pub struct PalmaRecord {
    pub municipality_id: String,
    pub municipality: String,
    pub key: ColumnKey,
    pub value: PalmaValue,
}

/// What to do with zero and infinite ratios.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DegeneratePolicy {
    /// Remove them from the table and the map.
    Drop,
    /// Keep them, listed and colored as their own categories.
    #[default]
    Flag,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedRow {
    /// 1-based position.
    pub rank: usize,
    pub municipality_id: String,
    pub municipality: String,
    pub ratio: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlaggedRow {
    pub municipality_id: String,
    pub municipality: String,
    pub value: PalmaValue,
}

/// Ranked table and coloring for one Palma selection.
#[derive(Clone, Debug, PartialEq)]
pub struct PalmaPresentation {
    pub key: ColumnKey,
    pub policy: DegeneratePolicy,
    /// Ordinary ratios, descending, ties by municipality name.
    pub ranked: Vec<RankedRow>,
    /// Zero and infinite ratios (empty under [`DegeneratePolicy::Drop`]).
    pub flagged: Vec<FlaggedRow>,
    pub scale: ColorScale,
}

impl PalmaPresentation {
    /// Column name in the upstream Palma table.
    pub fn column(&self) -> String {
        self.key.name(ColumnStyle::Palma)
    }

    /// Value shown for `municipality_id`, if it is part of the presentation.
    pub fn value_of(&self, municipality_id: &str) -> Option<PalmaValue> {
        self.ranked.iter()
            .find(|row| row.municipality_id == municipality_id)
            .map(|row| PalmaValue::Ratio(row.ratio))
            .or_else(|| self.flagged.iter()
                .find(|row| row.municipality_id == municipality_id)
                .map(|row| row.value))
    }

    /// Fill color of a value; `None` means the municipality is not drawn.
    pub fn fill(&self, value: PalmaValue) -> Option<Rgb> {
        match (value, self.policy) {
            (PalmaValue::Ratio(v), _) => Some(self.scale.color(v)),
            (PalmaValue::Zero, DegeneratePolicy::Flag) => Some(ZERO_RATIO_FILL),
            (PalmaValue::Infinite, DegeneratePolicy::Flag) => Some(INFINITE_RATIO_FILL),
            _ => None,
        }
    }

    /// Mean of the ordinary ratios only.
    pub fn mean_ratio(&self) -> Option<f64> {
        if self.ranked.is_empty() { return None }
        Some(self.ranked.iter().map(|row| row.ratio).sum::<f64>() / self.ranked.len() as f64)
    }
}

/// Select the ratios of one (mode, opportunity, cutoff) combination, drop
/// missing values (and, under [`DegeneratePolicy::Drop`], zero and infinite
/// ones), rank the rest and attach the fixed color scale.
pub fn prepare_palma(
    records: &[PalmaRecord],
    key: &ColumnKey,
    policy: DegeneratePolicy,
    scale: PalmaScale,
) -> Outcome<PalmaPresentation> {
    let selected = records.iter()
        .filter(|record| &record.key == key)
        .collect::<Vec<_>>();
    if selected.is_empty() {
        return Outcome::no_data(format!("no Palma ratios for {}", key));
    }

    let mut ranked = Vec::new();
    let mut flagged = Vec::new();
    for record in selected {
        match record.value {
            PalmaValue::Missing => {}
            PalmaValue::Ratio(ratio) => ranked.push(RankedRow {
                rank: 0,
                municipality_id: record.municipality_id.clone(),
                municipality: record.municipality.clone(),
                ratio,
            }),
            value => if policy == DegeneratePolicy::Flag {
                flagged.push(FlaggedRow {
                    municipality_id: record.municipality_id.clone(),
                    municipality: record.municipality.clone(),
                    value,
                });
            },
        }
    }

    if ranked.is_empty() && flagged.is_empty() {
        return Outcome::no_data(format!("every Palma ratio for {} is undefined", key));
    }

    ranked.sort_by(|a, b| b.ratio.total_cmp(&a.ratio).then_with(|| a.municipality.cmp(&b.municipality)));
    for (i, row) in ranked.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    flagged.sort_by(|a, b| degenerate_order(a.value, b.value).then_with(|| a.municipality.cmp(&b.municipality)));

    Outcome::Ready(PalmaPresentation {
        key: key.clone(),
        policy,
        ranked,
        flagged,
        scale: ColorScale::palma(scale),
    })
}

/// Infinite ratios (bottom 40% cut off) are listed before zero ratios.
fn degenerate_order(a: PalmaValue, b: PalmaValue) -> Ordering {
    let weight = |v: PalmaValue| match v {
        PalmaValue::Infinite => 0,
        _ => 1,
    };
    weight(a).cmp(&weight(b))
}
