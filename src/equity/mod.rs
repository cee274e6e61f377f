//! Palma ratio presentation: the access of the top 10% income group divided
//! by that of the bottom 40%, per municipality.

mod palma;

pub use palma::{
    prepare_palma, DegeneratePolicy, FlaggedRow, PalmaPresentation, PalmaRecord, PalmaValue, RankedRow,
    INFINITE_RATIO_FILL, ZERO_RATIO_FILL,
};
