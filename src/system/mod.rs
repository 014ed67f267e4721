//! Provides the boundary to the host system.
//!
//! Includes:
//! - `runner`: executing external commands and reading their exit status.
//! - `probe`: startup checks for installed tools and privilege level.

mod probe;
mod runner;
#[cfg(test)]
pub mod test_mocks;

pub use probe::*;
pub use runner::*;
#[cfg(test)]
pub use test_mocks::*;
