//! Narrative module - the mystery's authored truth.
//!
//! A [`NarrativeSpine`] holds the conflict, the true resolution and a graph
//! of revelations where each may depend on one earlier revelation. Final
//! accusations are judged against the resolution's evidence chain.

mod revelation;
mod spine;

pub use revelation::*;
pub use spine::*;
