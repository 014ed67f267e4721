//! Handles Command Line Interface (CLI) related functionalities.
//!
//! Includes argument parsing, the menu state machine, user prompts,
//! output rendering and the dispatcher that ties them to the actions.

mod args;
mod dispatcher;
mod menu;
mod prompt;
mod render;
#[cfg(test)]
mod test_mocks;

pub use args::*;
pub use dispatcher::*;
pub use prompt::*;
#[cfg(test)]
pub use test_mocks::*;
