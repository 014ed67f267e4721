//! Defines the data structures shared between the dispatcher and the actions.
//!
//! This covers the per-action outcome taxonomy and the report rows collected
//! while running the full maintenance sequence.

mod outcome;

pub use outcome::*;
