//! Defines the application's primary error type `AppError` and a convenience `Result` alias.
//!
//! Uses the `thiserror` crate for ergonomic error definition and provides `From`
//! implementations to convert common external errors into `AppError` variants.
//! Errors that do not implement `Clone` are wrapped in `Arc` to allow `AppError` to be cloneable.

use std::sync::Arc;
use thiserror::Error;

/// The primary error enumeration for all application-specific errors.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// One or more external commands an action needs are not installed.
    #[error("Missing Tool: {}", .0.join(", "))]
    MissingTool(Vec<String>),

    /// An external command ran but reported failure through its exit status.
    #[error("Action Failure: `{command}` {status}")]
    ActionFailure { command: String, status: String },

    /// Menu input that does not name a registered action.
    #[error("Invalid Selection: '{0}' is not a menu entry")]
    InvalidSelection(String),

    /// A menu id that the registry does not know about.
    #[error("Unknown Action: {0}")]
    NotFound(u8),

    /// Unrecoverable condition detected before any action runs.
    #[error("Startup Error: {0}")]
    FatalStartup(String),

    /// An external command was killed by an interrupt or termination signal.
    #[error("Interrupted: `{command}` was terminated by signal {signal}")]
    Interrupted { command: String, signal: i32 },

    /// Error related to standard I/O operations (spawning processes, removing directories).
    #[error("I/O Error: {0}")]
    Io(Arc<std::io::Error>),

    /// Error originating from user interaction prompts (`dialoguer`).
    #[error("Dialoguer Error: {0}")]
    Dialoguer(Arc<dialoguer::Error>),
}

impl AppError {
    /// Whether this error must stop the dispatcher instead of being reported and skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::FatalStartup(_) | AppError::Interrupted { .. })
    }
}

/// A specialized `Result` type using the application's `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

// --- From implementations ---
// Arc is used for non-Clone error types.

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(Arc::new(err))
    }
}

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        AppError::Dialoguer(Arc::new(err))
    }
}
