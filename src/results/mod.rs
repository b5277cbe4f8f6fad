//! Result types, normalization and rescoring
//!
//! Every provider payload is mapped into [`SearchResult`] before it leaves the
//! race engine; scores are only ever assigned by the [`Rescorer`].

mod rescore;
mod types;

pub use rescore::{Rescorer, DEFAULT_TOP_N, NEUTRAL_WEIGHT};
pub use types::*;
