//! Result types reported for each executed maintenance action.

use crate::error::AppError;
use std::fmt;

/// Expected "nothing to do" results that are reported as information, not as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The orphan query found no packages without dependents.
    NoOrphans,
    /// The firmware manager reported no pending updates.
    NoUpdatesAvailable,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoOrphans => write!(f, "No orphaned packages to remove."),
            Notice::NoUpdatesAvailable => write!(f, "No firmware updates available."),
        }
    }
}

/// Why an action was not attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Required external commands are absent.
    MissingTool(Vec<String>),
    /// The user did not confirm a destructive action.
    Declined,
}

/// What happened when the dispatcher handled one action.
#[derive(Debug, Clone)]
pub enum Outcome {
    Success,
    Notice(Notice),
    Skipped(SkipReason),
    Failed(AppError),
}

impl Outcome {
    /// Short tag used in the run summary table.
    pub fn tag(&self) -> &'static str {
        match self {
            Outcome::Success => "ok",
            Outcome::Notice(_) => "nothing to do",
            Outcome::Skipped(_) => "skipped",
            Outcome::Failed(_) => "failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// Outcome of a single action in a `--all` run, in execution order.
#[derive(Debug, Clone)]
pub struct ActionReport {
    pub id: u8,
    pub label: &'static str,
    pub outcome: Outcome,
}
