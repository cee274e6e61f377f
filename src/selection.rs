//! Parameters chosen by the user, and their validation.

use std::fmt;

use anyhow::Result;

use crate::{access::MAX_MINUTES, outcome::Outcome, vocab::{ColumnKey, Mode, Vocabulary}};

/// Name of the whole-country area option.
pub const FINLAND: &str = "Finland";

/// Area of interest: the whole country or one municipality.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Area {
    Finland,
    Municipality(String),
}

impl Area {
    /// Interpret a selector value; an empty value means "not selected".
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "" => None,
            FINLAND => Some(Area::Finland),
            name => Some(Area::Municipality(name.to_string())),
        }
    }

    /// Whether an origin in `municipality` belongs to this area.
    pub fn contains(&self, municipality: &str) -> bool {
        match self {
            Area::Finland => true,
            Area::Municipality(name) => name == municipality,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Area::Finland => FINLAND,
            Area::Municipality(name) => name,
        }
    }

    /// Key under which subsets for this area are cached.
    pub fn cache_key(&self) -> String {
        format!("area:{}", self.name())
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A control the user still has to fill in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionField {
    Area,
    Mode,
    Opportunity,
    Cutoff,
    Municipalities,
    OpportunityTypes,
}

impl fmt::Display for SelectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SelectionField::Area => "area of interest",
            SelectionField::Mode => "mode of transportation",
            SelectionField::Opportunity => "opportunity type",
            SelectionField::Cutoff => "travel time cut-off",
            SelectionField::Municipalities => "at least one municipality for each selection",
            SelectionField::OpportunityTypes => "at least one opportunity type",
        })
    }
}

/// Raw selection for the cumulative access map.
#[derive(Clone, Debug, Default)]
pub struct AccessSelection {
    pub area: Option<String>,
    pub mode: Option<Mode>,
    pub opportunity: Option<String>,
    pub cutoff: Option<String>,
    /// Use the class intervals of the largest cutoff for every cutoff.
    pub shared_bins: bool,
}

/// A complete, validated access map query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessQuery {
    pub area: Area,
    pub key: ColumnKey,
    pub opportunity_label: String,
    pub shared_bins: bool,
}

impl AccessSelection {
    pub fn resolve(&self, vocab: &Vocabulary) -> Result<Outcome<AccessQuery>> {
        let area = self.area.as_deref().and_then(Area::parse);
        let opportunity = non_empty(&self.opportunity);
        let cutoff = non_empty(&self.cutoff);

        let mut missing = Vec::new();
        if area.is_none() { missing.push(SelectionField::Area) }
        if self.mode.is_none() { missing.push(SelectionField::Mode) }
        if opportunity.is_none() { missing.push(SelectionField::Opportunity) }
        if cutoff.is_none() { missing.push(SelectionField::Cutoff) }

        let (Some(area), Some(mode), Some(opportunity), Some(cutoff)) = (area, self.mode, opportunity, cutoff) else {
            return Ok(Outcome::Incomplete(missing));
        };

        let spec = vocab.opportunity(opportunity)?;
        let cutoff = vocab.cutoff(cutoff)?;
        Ok(Outcome::Ready(AccessQuery {
            area,
            key: ColumnKey::new(mode, &spec.abbrev, cutoff),
            opportunity_label: spec.label.clone(),
            shared_bins: self.shared_bins,
        }))
    }
}

/// Raw selection for the Palma ratio page.
#[derive(Clone, Debug, Default)]
pub struct PalmaSelection {
    pub mode: Option<Mode>,
    pub opportunity: Option<String>,
    pub cutoff: Option<String>,
}

/// A complete, validated Palma query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PalmaQuery {
    pub key: ColumnKey,
    pub opportunity_label: String,
}

impl PalmaSelection {
    pub fn resolve(&self, vocab: &Vocabulary) -> Result<Outcome<PalmaQuery>> {
        let opportunity = non_empty(&self.opportunity);
        let cutoff = non_empty(&self.cutoff);

        let mut missing = Vec::new();
        if self.mode.is_none() { missing.push(SelectionField::Mode) }
        if opportunity.is_none() { missing.push(SelectionField::Opportunity) }
        if cutoff.is_none() { missing.push(SelectionField::Cutoff) }

        let (Some(mode), Some(opportunity), Some(cutoff)) = (self.mode, opportunity, cutoff) else {
            return Ok(Outcome::Incomplete(missing));
        };

        let spec = vocab.opportunity(opportunity)?;
        let cutoff = vocab.cutoff(cutoff)?;
        Ok(Outcome::Ready(PalmaQuery {
            key: ColumnKey::new(mode, &spec.abbrev, cutoff),
            opportunity_label: spec.label.clone(),
        }))
    }
}

/// Selection for the spatial distribution page.
#[derive(Clone, Debug, Default)]
pub struct OpportunitySelection {
    pub types: Vec<String>,
    /// Defaults to the whole country.
    pub area: Option<String>,
}

impl OpportunitySelection {
    pub fn resolve(&self) -> Outcome<(Vec<String>, Area)> {
        let types = self.types.iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        if types.is_empty() {
            return Outcome::Incomplete(vec![SelectionField::OpportunityTypes]);
        }
        let area = self.area.as_deref().and_then(Area::parse).unwrap_or(Area::Finland);
        Outcome::Ready((types, area))
    }
}

/// Municipalities whose cumulative curves are drawn; an empty list means
/// every municipality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveSelection {
    pub municipalities: Vec<String>,
    pub max_minutes: u32,
}

impl Default for CurveSelection {
    fn default() -> Self {
        Self { municipalities: Vec::new(), max_minutes: MAX_MINUTES }
    }
}

impl CurveSelection {
    pub fn new(municipalities: Vec<String>) -> Self {
        Self { municipalities: clean_names(&municipalities), ..Self::default() }
    }
}

/// Two municipality selections drawn on one chart. Unlike a single
/// selection, both sides must name at least one municipality.
#[derive(Clone, Debug, Default)]
pub struct CurveComparison {
    pub first: Vec<String>,
    pub second: Vec<String>,
    pub max_minutes: Option<u32>,
}

impl CurveComparison {
    pub fn resolve(&self) -> Outcome<(CurveSelection, CurveSelection)> {
        let first = clean_names(&self.first);
        let second = clean_names(&self.second);
        if first.is_empty() || second.is_empty() {
            return Outcome::Incomplete(vec![SelectionField::Municipalities]);
        }
        let max_minutes = self.max_minutes.unwrap_or(MAX_MINUTES);
        Outcome::Ready((
            CurveSelection { municipalities: first, max_minutes },
            CurveSelection { municipalities: second, max_minutes },
        ))
    }
}

fn clean_names(names: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(names.len());
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        if !out.iter().any(|existing: &String| existing == name) {
            out.push(name.to_string());
        }
    }
    out
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
