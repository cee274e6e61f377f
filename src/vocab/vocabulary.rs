use anyhow::{anyhow, ensure, Result};
use serde::{Deserialize, Serialize};

use super::Mode;

/// One opportunity (destination) type and the abbreviation the upstream
/// pipeline uses for it in column names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunitySpec {
    pub label: String,
    pub abbrev: String,
    /// Whether Palma ratios were computed for this opportunity type.
    #[serde(default)]
    pub palma: bool,
}

impl OpportunitySpec {
    fn new(label: &str, abbrev: &str, palma: bool) -> Self {
        Self { label: label.into(), abbrev: abbrev.into(), palma }
    }
}

/// The discrete choices offered to the user: modes, opportunity types and
/// travel-time cutoffs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub modes: Vec<Mode>,
    pub opportunities: Vec<OpportunitySpec>,
    pub cutoffs: Vec<u32>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            modes: Mode::ALL.to_vec(),
            opportunities: vec![
                OpportunitySpec::new("Pharmacy", "aptk", true),
                OpportunitySpec::new("Grocery store", "ruok", true),
                OpportunitySpec::new("Library", "kirja", true),
                OpportunitySpec::new("Public sports facility", "lahi", false),
                OpportunitySpec::new("School", "koul", true),
                OpportunitySpec::new("Healthcare", "sair", true),
                OpportunitySpec::new("Jobs", "tyo", false),
            ],
            cutoffs: vec![30, 45, 60],
        }
    }
}

impl Vocabulary {
    /// Look up an opportunity by label or abbreviation (case-insensitive).
    pub fn opportunity(&self, name: &str) -> Result<&OpportunitySpec> {
        let name = name.trim();
        self.opportunities.iter()
            .find(|spec| spec.label.eq_ignore_ascii_case(name) || spec.abbrev.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow!("[vocab] Unknown opportunity type {:?}", name))
    }

    /// Opportunity types that have Palma ratio columns.
    pub fn palma_opportunities(&self) -> impl Iterator<Item = &OpportunitySpec> {
        self.opportunities.iter().filter(|spec| spec.palma)
    }

    /// Parse a cutoff given as `"30"` or `"30 min"` and check it is offered.
    pub fn cutoff(&self, value: &str) -> Result<u32> {
        let minutes = value.split_whitespace().next()
            .ok_or_else(|| anyhow!("[vocab] Empty travel-time cutoff"))?
            .parse::<u32>()
            .map_err(|e| anyhow!("[vocab] Invalid travel-time cutoff {:?}: {}", value, e))?;
        ensure!(self.cutoffs.contains(&minutes),
            "[vocab] Cutoff {} min is not one of {:?}", minutes, self.cutoffs);
        Ok(minutes)
    }

    /// The largest offered cutoff; its column is the shared bin reference.
    pub fn reference_cutoff(&self) -> Option<u32> {
        self.cutoffs.iter().copied().max()
    }
}
