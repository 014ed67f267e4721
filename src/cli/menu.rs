//! State machine behind the interactive menu.
//!
//! [`transition`] is pure: it only decides the next state and which effect the
//! dispatcher should perform, so the loop can be tested without a terminal.

use crate::actions::Registry;

/// Menu entry reserved for leaving the program.
pub const EXIT_ID: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    /// Waiting for a selection.
    Menu,
    /// Running the action with this id.
    Executing(u8),
    /// Terminal.
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    /// A line typed at the menu prompt.
    Line(String),
    /// Standard input was closed or the prompt was cancelled.
    InputClosed,
    /// The running action has reported its outcome.
    Finished,
}

/// Side effect requested from the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Execute(u8),
    InvalidSelection(String),
    Farewell,
}

pub fn transition(state: MenuState, event: &MenuEvent, registry: &Registry) -> (MenuState, Effect) {
    match (state, event) {
        (MenuState::Menu, MenuEvent::Line(line)) => {
            let input = line.trim();
            match input.parse::<u8>() {
                Ok(EXIT_ID) => (MenuState::Exit, Effect::Farewell),
                Ok(id) if registry.lookup(id).is_ok() => (MenuState::Executing(id), Effect::Execute(id)),
                _ => (MenuState::Menu, Effect::InvalidSelection(input.to_string())),
            }
        },
        (MenuState::Menu, MenuEvent::InputClosed) => (MenuState::Exit, Effect::Farewell),
        (MenuState::Executing(_), MenuEvent::Finished) => (MenuState::Menu, Effect::None),
        (state, _) => (state, Effect::None),
    }
}
