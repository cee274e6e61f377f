//! Vocabulary shared with the upstream accessibility pipeline: transport
//! modes, opportunity types, cutoffs and the column naming contract.

mod column;
mod mode;
mod vocabulary;

pub use column::{ColumnKey, ColumnStyle};
pub use mode::Mode;
pub use vocabulary::{OpportunitySpec, Vocabulary};
