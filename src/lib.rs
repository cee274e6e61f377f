#![doc = "AccessAtlas public API"]
//! Cumulative accessibility and access-equity views over precomputed
//! national accessibility datasets: cumulative-share curves, binned access
//! choropleths, Palma ratio rankings and opportunity distributions.

mod common;
mod io;

pub mod access;
pub mod cache;
pub mod classify;
pub mod config;
pub mod equity;
pub mod map;
pub mod outcome;
pub mod selection;
pub mod session;
pub mod table;
pub mod view;
pub mod vocab;

#[doc(inline)]
pub use config::DataConfig;

#[doc(inline)]
pub use outcome::Outcome;

#[doc(inline)]
pub use session::Session;

#[doc(inline)]
pub use selection::{AccessSelection, Area, CurveComparison, CurveSelection, OpportunitySelection, PalmaSelection};

#[doc(inline)]
pub use equity::DegeneratePolicy;

#[doc(inline)]
pub use classify::PalmaScale;

#[doc(inline)]
pub use vocab::Mode;

/// Proj string of ETRS89 / TM35FIN, for `DataConfig::source_crs`.
pub use io::proj::ETRS_TM35FIN;
