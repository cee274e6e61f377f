use std::{fmt, sync::LazyLock};

use regex::Regex;

use super::Mode;

/// Naming convention of a numeric column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnStyle {
    /// Cumulative access counts on the grid: `JL_aptk30`.
    Access,
    /// Palma ratios per municipality: `jl_aptk_30`.
    Palma,
}

static ACCESS_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<mode>JL|PP)_(?P<opp>[a-z]+)(?P<cutoff>\d+)$").expect("valid regex")
});

static PALMA_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<mode>jl|pp)_(?P<opp>[a-z]+)_(?P<cutoff>\d+)$").expect("valid regex")
});

/// A (mode, opportunity, cutoff) combination, which selects exactly one
/// numeric column of an upstream table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColumnKey {
    pub mode: Mode,
    pub opportunity: String,
    pub cutoff: u32,
}

impl ColumnKey {
    pub fn new(mode: Mode, opportunity: &str, cutoff: u32) -> Self {
        Self { mode, opportunity: opportunity.to_string(), cutoff }
    }

    /// Column name under the given naming convention.
    pub fn name(&self, style: ColumnStyle) -> String {
        match style {
            ColumnStyle::Access => format!("{}_{}{}", self.mode.abbrev(), self.opportunity, self.cutoff),
            ColumnStyle::Palma => format!("{}_{}_{}", self.mode.abbrev().to_lowercase(), self.opportunity, self.cutoff),
        }
    }

    /// Same mode and opportunity at another cutoff.
    pub fn with_cutoff(&self, cutoff: u32) -> Self {
        Self { cutoff, ..self.clone() }
    }

    /// Recognise a column name in either convention.
    pub fn parse(name: &str) -> Option<(Self, ColumnStyle)> {
        let (caps, style) = if let Some(caps) = ACCESS_COLUMN.captures(name) {
            (caps, ColumnStyle::Access)
        } else {
            (PALMA_COLUMN.captures(name)?, ColumnStyle::Palma)
        };
        let mode = Mode::from_abbrev(&caps["mode"])?;
        let cutoff = caps["cutoff"].parse().ok()?;
        Some((Self { mode, opportunity: caps["opp"].to_string(), cutoff }, style))
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {} min", self.mode, self.opportunity, self.cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_both_naming_conventions() {
        let key = ColumnKey::new(Mode::Transit, "aptk", 30);
        assert_eq!(key.name(ColumnStyle::Access), "JL_aptk30");
        assert_eq!(key.name(ColumnStyle::Palma), "jl_aptk_30");
        assert_eq!(key.with_cutoff(60).name(ColumnStyle::Access), "JL_aptk60");
    }

    #[test]
    fn parses_column_names() {
        assert_eq!(ColumnKey::parse("PP_kirja45"),
            Some((ColumnKey::new(Mode::Cycling, "kirja", 45), ColumnStyle::Access)));
        assert_eq!(ColumnKey::parse("jl_sair_60"),
            Some((ColumnKey::new(Mode::Transit, "sair", 60), ColumnStyle::Palma)));
        assert_eq!(ColumnKey::parse("mncplty"), None);
        assert_eq!(ColumnKey::parse("JL_aptk_30"), None);
        assert_eq!(ColumnKey::parse("jl_aptk30"), None);
    }
}
