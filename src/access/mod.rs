//! Cumulative-share curves: the fraction of a population able to reach its
//! nearest facility within each travel time.

mod cumulative;
mod curve_set;
mod grouping;

pub use cumulative::{compute_cumulative_share, compute_curves, CumulativeSharePoint, MAX_AXIS_MINUTES, MAX_MINUTES};
pub use curve_set::{CurveSet, CURVE_TITLE};
pub use grouping::{combine, group_label, title_label, Comparison, ALL_MUNICIPALITIES};
