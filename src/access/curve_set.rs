use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame};
use serde::Serialize;

use crate::{common, io};

use super::{Comparison, CumulativeSharePoint};

/// Chart title of the educational facility curves.
pub const CURVE_TITLE: &str = "Accessibility of nearest educational facilities";

/// Curves ready for a line chart: x is `travel_time`, y is `share`, series
/// are told apart by `mode` and `group`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CurveSet {
    pub title: String,
    /// How the groups of a two-selection chart are labelled.
    #[serde(skip)]
    pub comparison: Option<Comparison>,
    pub points: Vec<CumulativeSharePoint>,
}

impl CurveSet {
    /// Distinct series labels, in order of appearance.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for point in &self.points {
            if !groups.contains(&point.group.as_str()) {
                groups.push(&point.group);
            }
        }
        groups
    }

    /// Share at `travel_time` for one series.
    pub fn share(&self, group: &str, mode: crate::vocab::Mode, travel_time: u32) -> Option<f64> {
        self.points.iter()
            .find(|p| p.group == group && p.mode == mode && p.travel_time == travel_time)
            .map(|p| p.share)
    }

    /// Long table with columns `travel_time`, `access`, `mode`, `group`.
    pub fn to_frame(&self) -> Result<DataFrame> {
        DataFrame::new(vec![
            Column::new("travel_time".into(), self.points.iter().map(|p| p.travel_time).collect::<Vec<_>>()),
            Column::new("access".into(), self.points.iter().map(|p| p.share).collect::<Vec<_>>()),
            Column::new("mode".into(), self.points.iter().map(|p| p.mode.label()).collect::<Vec<_>>()),
            Column::new("group".into(), self.points.iter().map(|p| p.group.as_str()).collect::<Vec<_>>()),
        ]).context("[access::curve_set] Failed to build curve table")
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        common::ensure_parent_exists(path)?;
        io::write_csv(&mut self.to_frame()?, path)?;
        log::info!("[access::curve_set] wrote {} points to {}", self.points.len(), path.display());
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("[access::curve_set] Failed to serialize curves")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::Mode;

    fn curves() -> CurveSet {
        let point = |travel_time, mode, share, group: &str| CumulativeSharePoint { travel_time, mode, share, group: group.into() };
        CurveSet {
            title: CURVE_TITLE.into(),
            comparison: None,
            points: vec![
                point(0, Mode::Transit, 0.0, "Espoo"),
                point(1, Mode::Transit, 0.5, "Espoo"),
                point(0, Mode::Cycling, 0.25, "Espoo"),
                point(1, Mode::Cycling, 1.0, "Espoo"),
            ],
        }
    }

    #[test]
    fn lookup() {
        let curves = curves();
        assert_eq!(curves.groups(), vec!["Espoo"]);
        assert_eq!(curves.share("Espoo", Mode::Cycling, 1), Some(1.0));
        assert_eq!(curves.share("Oulu", Mode::Cycling, 1), None);
    }

    #[test]
    fn csv_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curves.csv");
        curves().write_csv(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("travel_time,access,mode,group"));
        let first = lines.next().unwrap();
        assert!(first.starts_with("0,0"));
        assert!(first.ends_with(",Public transport + 1 000 m walk,Espoo"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn json_output() {
        let json = curves().to_json().unwrap();
        assert!(json.contains("\"travel_time\": 1"));
        assert!(!json.contains("comparison"));
    }
}
