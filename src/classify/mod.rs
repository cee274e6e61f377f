//! Class boundaries and color ramps shared by the choropleth layers.

mod bins;
mod color;

pub use bins::{compute_bins, finite_max, BinReference, ClassificationBins, DEFAULT_CLASSES};
pub use color::{ColorScale, PalmaScale, Rgb, NO_ACCESS};
