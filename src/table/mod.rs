//! Typed views over the loaded upstream tables.

mod opportunity;
mod origin;
mod palma;

pub use opportunity::{OpportunityCount, OpportunitySummary, OpportunityTable};
pub use origin::{OriginValues, PopulationTable, TravelTimeTable};
pub use palma::PalmaTable;

/// Sorted, de-duplicated non-empty names.
pub(crate) fn unique_sorted<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut names = names.into_iter()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();
    names.sort();
    names.dedup();
    names
}
