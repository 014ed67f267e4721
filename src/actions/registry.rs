//! The ordered, immutable list of maintenance actions.

use super::catalog::{CATALOGUE, CURATED_ORDER};
use super::context::ActionContext;
use crate::error::{AppError, Result};
use crate::models::Notice;

/// Body of an action. `Ok(Some(_))` reports an expected empty result.
pub type ActionFn = fn(&mut ActionContext<'_>) -> Result<Option<Notice>>;

/// A single named maintenance operation.
#[derive(Debug, Clone, Copy)]
pub struct Action {
    /// Menu number, stable across runs.
    pub id: u8,
    pub label: &'static str,
    /// Commands that must be on `PATH` for the action to be attempted.
    pub required_tools: &'static [&'static str],
    /// Built-in confirmation flag; the effective set lives in the runtime configuration.
    pub destructive: bool,
    /// At least one step runs through the elevation helper when not root.
    pub privileged: bool,
    pub run: ActionFn,
}

/// Lookup and ordered iteration over the actions. Never mutated after construction.
#[derive(Debug)]
pub struct Registry {
    actions: Vec<Action>,
    curated: Vec<u8>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            actions: CATALOGUE.to_vec(),
            curated: CURATED_ORDER.to_vec(),
        }
    }

    /// Find an action by menu id.
    pub fn lookup(&self, id: u8) -> Result<&Action> {
        self.actions
            .iter()
            .find(|action| action.id == id)
            .ok_or(AppError::NotFound(id))
    }

    /// Actions in menu order.
    pub fn all(&self) -> &[Action] {
        &self.actions
    }

    /// Actions in the order used by the full maintenance run.
    pub fn curated(&self) -> Vec<&Action> {
        self.curated
            .iter()
            .filter_map(|id| self.lookup(*id).ok())
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
