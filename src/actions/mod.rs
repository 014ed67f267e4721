//! Maintenance actions and the registry that orders them.
//!
//! Includes:
//! - `registry`: the `Action` descriptor and the immutable `Registry`.
//! - `catalog`: the concrete actions and the curated full-run order.
//! - `context`: what an action body can use while it runs.

mod catalog;
#[cfg(test)]
mod catalog_test;
mod context;
mod registry;

pub use context::*;
pub use registry::*;
