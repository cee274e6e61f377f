use std::{fmt, str::FromStr};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Transport mode an accessibility value was routed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Public transport with at most 1 000 m of walking per leg.
    Transit,
    Cycling,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Transit, Mode::Cycling];

    /// Human readable label used for series names and legends.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Transit => "Public transport + 1 000 m walk",
            Mode::Cycling => "Cycling",
        }
    }

    /// Abbreviation used by the upstream pipeline in column names (`JL`, `PP`).
    pub fn abbrev(&self) -> &'static str {
        match self {
            Mode::Transit => "JL",
            Mode::Cycling => "PP",
        }
    }

    pub fn from_abbrev(abbrev: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.abbrev().eq_ignore_ascii_case(abbrev))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    /// Accepts the short names (`transit`, `cycling`), the column abbreviations
    /// and the labels shown in the dashboard mode selectors.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        match key.as_str() {
            "transit" | "pt" | "jl" | "public transport" | "public transport + 1 000 m walk" => Ok(Mode::Transit),
            "cycling" | "bicycle" | "bike" | "pp" => Ok(Mode::Cycling),
            _ => bail!("[vocab::mode] Unknown transport mode {:?}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_and_abbreviations() {
        assert_eq!("transit".parse::<Mode>().unwrap(), Mode::Transit);
        assert_eq!("JL".parse::<Mode>().unwrap(), Mode::Transit);
        assert_eq!("Public transport + 1 000 m walk".parse::<Mode>().unwrap(), Mode::Transit);
        assert_eq!("Bicycle".parse::<Mode>().unwrap(), Mode::Cycling);
        assert_eq!("pp".parse::<Mode>().unwrap(), Mode::Cycling);
        assert!("walking".parse::<Mode>().is_err());
    }

    #[test]
    fn abbreviation_lookup_ignores_case() {
        assert_eq!(Mode::from_abbrev("jl"), Some(Mode::Transit));
        assert_eq!(Mode::from_abbrev("PP"), Some(Mode::Cycling));
        assert_eq!(Mode::from_abbrev("XX"), None);
    }
}
