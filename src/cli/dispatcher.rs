//! Drives the interactive menu and the unattended full run.
//!
//! The dispatcher owns the error and confirmation policy: missing tools turn
//! into skips, declined confirmations into skips, action errors into a
//! reported failure. Only fatal errors leave [`Dispatcher::execute`].

use super::menu::{transition, Effect, MenuEvent, MenuState};
use super::prompt::Prompter;
use super::render;
use crate::actions::{Action, ActionContext, Mode, Registry};
use crate::config::RuntimeConfig;
use crate::error::{AppError, Result};
use crate::models::{ActionReport, Outcome, SkipReason};
use crate::system::CommandRunner;
use chrono::Local;
use colored::*;
use std::io::Write;
use tracing::{error, info, warn};

pub struct Dispatcher<'a, R, P, W> {
    registry: &'a Registry,
    config: &'a RuntimeConfig,
    runner: R,
    prompter: P,
    out: W,
}

impl<'a, R, P, W> Dispatcher<'a, R, P, W>
where
    R: CommandRunner,
    P: Prompter,
    W: Write,
{
    pub fn new(
        registry: &'a Registry,
        config: &'a RuntimeConfig,
        runner: R,
        prompter: P,
        out: W,
    ) -> Self {
        Self {
            registry,
            config,
            runner,
            prompter,
            out,
        }
    }

    /// Check tools, confirm if needed, run the action and print its outcome line.
    ///
    /// Returns `Err` only for fatal conditions (and broken output).
    pub fn execute(&mut self, action: &Action, mode: Mode) -> Result<Outcome> {
        let missing = self.config.missing_for(action);
        let outcome = if !missing.is_empty() {
            warn!("Skipping '{}': missing {:?}", action.label, missing);
            Outcome::Skipped(SkipReason::MissingTool(missing))
        } else if mode == Mode::Interactive
            && self.config.is_destructive(action)
            && !self.confirmed(action)
        {
            info!("'{}' not confirmed, skipping", action.label);
            Outcome::Skipped(SkipReason::Declined)
        } else {
            info!("Running '{}'", action.label);
            let mut ctx = ActionContext::new(self.config, mode, &mut self.runner);
            match (action.run)(&mut ctx) {
                Ok(None) => Outcome::Success,
                Ok(Some(notice)) => Outcome::Notice(notice),
                Err(err) if err.is_fatal() => {
                    error!("'{}' aborted: {:?}", action.label, err);
                    let line = render::outcome_line(action.label, &Outcome::Failed(err.clone()));
                    writeln!(self.out, "{}", line)?;
                    return Err(err);
                },
                Err(err) => {
                    error!("'{}' failed: {:?}", action.label, err);
                    Outcome::Failed(err)
                },
            }
        };

        writeln!(self.out, "{}", render::outcome_line(action.label, &outcome))?;
        Ok(outcome)
    }

    fn confirmed(&mut self, action: &Action) -> bool {
        let question = format!("{}: proceed?", action.label);
        match self.prompter.confirm(&question, self.config.confirm_default) {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Could not read confirmation: {}", e);
                false
            },
        }
    }

    /// Menu loop; returns when the exit entry is chosen or input closes.
    pub fn run_interactive(&mut self) -> Result<()> {
        let registry = self.registry;
        let mut state = MenuState::Menu;

        while state != MenuState::Exit {
            writeln!(self.out, "{}", render::menu_table(registry, self.config))?;

            let event = match self.prompter.read_selection() {
                Ok(Some(line)) => MenuEvent::Line(line),
                Ok(None) => MenuEvent::InputClosed,
                Err(e) => {
                    warn!("Could not read selection: {}", e);
                    MenuEvent::InputClosed
                },
            };

            let (next, effect) = transition(state, &event, registry);
            state = next;

            match effect {
                Effect::Execute(id) => {
                    let action = *registry.lookup(id)?;
                    writeln!(self.out, "\n---\n")?;
                    self.execute(&action, Mode::Interactive)?;
                    writeln!(self.out, "\n---\n")?;
                    state = transition(state, &MenuEvent::Finished, registry).0;
                },
                Effect::InvalidSelection(input) => {
                    let err = AppError::InvalidSelection(input);
                    warn!("{}", err);
                    eprintln!("{}", format!("{}. Enter a number from the menu.", err).red());
                },
                Effect::Farewell => {
                    info!("Leaving the menu");
                    writeln!(self.out, "{}", "Exiting. Goodbye!".green())?;
                },
                Effect::None => {},
            }
        }

        Ok(())
    }

    /// Every action once, in curated order, without confirmation prompts.
    ///
    /// Failures are reported and the sequence continues; a fatal error stops it.
    pub fn run_all(&mut self) -> Result<Vec<ActionReport>> {
        let registry = self.registry;
        let started = Local::now();
        info!("Starting full maintenance run");
        writeln!(
            self.out,
            "{}",
            format!(
                "Running all maintenance tasks ({})",
                started.format("%Y-%m-%d %H:%M:%S")
            )
            .cyan()
            .bold()
        )?;

        let mut reports = Vec::new();
        for action in registry.curated() {
            writeln!(self.out, "\n==> {}", action.label.bold())?;
            let outcome = self.execute(action, Mode::Unattended)?;
            reports.push(ActionReport {
                id: action.id,
                label: action.label,
                outcome,
            });
        }

        let failures = reports.iter().filter(|r| r.outcome.is_failure()).count();
        info!(
            "Full maintenance run finished: {} actions, {} failed",
            reports.len(),
            failures
        );
        writeln!(self.out, "\n{}", render::summary_table(&reports))?;
        writeln!(
            self.out,
            "Finished in {}",
            render::format_elapsed(Local::now() - started)
        )?;
        Ok(reports)
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    #[cfg(test)]
    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }
}
