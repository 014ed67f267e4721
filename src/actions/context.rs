use crate::config::RuntimeConfig;
use crate::error::{AppError, Result};
use crate::system::{CommandRunner, Invocation, InvocationResult};
use nix::sys::signal::Signal;
use tracing::{debug, warn};

/// Whether a person is at the keyboard for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    /// `--all`: no prompts, tools are told to assume yes.
    Unattended,
}

/// Everything an action body may use: configuration, mode and the command runner.
pub struct ActionContext<'a> {
    pub config: &'a RuntimeConfig,
    pub mode: Mode,
    runner: &'a mut dyn CommandRunner,
}

impl<'a> ActionContext<'a> {
    pub fn new(config: &'a RuntimeConfig, mode: Mode, runner: &'a mut dyn CommandRunner) -> Self {
        Self {
            config,
            mode,
            runner,
        }
    }

    pub fn unattended(&self) -> bool {
        self.mode == Mode::Unattended
    }

    /// Wrap `invocation` with the elevation helper unless the process is already root.
    pub fn privileged(&self, invocation: Invocation) -> Invocation {
        if self.config.elevated {
            invocation
        } else {
            invocation.elevated_with(&self.config.elevation_helper)
        }
    }

    /// Run one step and return its result whatever the exit code.
    ///
    /// A child killed by SIGINT or SIGTERM becomes [`AppError::Interrupted`].
    pub fn run(&mut self, invocation: &Invocation) -> Result<InvocationResult> {
        let result = self.runner.run(invocation)?;
        if let Some(signal) = result.signal {
            if signal == Signal::SIGINT as i32 || signal == Signal::SIGTERM as i32 {
                return Err(AppError::Interrupted {
                    command: invocation.to_string(),
                    signal,
                });
            }
        }
        Ok(result)
    }

    /// Run one step and turn a non-zero exit into [`AppError::ActionFailure`].
    pub fn expect_success(&mut self, invocation: &Invocation) -> Result<InvocationResult> {
        let result = self.run(invocation)?;
        if result.success() {
            Ok(result)
        } else {
            Err(failure(invocation, &result))
        }
    }

    /// Run steps that do not depend on each other.
    ///
    /// Every step is attempted; the first failure is returned once all have run.
    /// Fatal errors stop immediately.
    pub fn run_independent(&mut self, steps: &[Invocation]) -> Result<()> {
        let mut first_failure = None;
        for step in steps {
            match self.expect_success(step) {
                Ok(_) => debug!("`{}` succeeded", step),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!("{}", err);
                    first_failure.get_or_insert(err);
                },
            }
        }
        first_failure.map_or(Ok(()), Err)
    }
}

/// Failure error for `invocation` finishing with `result`.
pub fn failure(invocation: &Invocation, result: &InvocationResult) -> AppError {
    AppError::ActionFailure {
        command: invocation.to_string(),
        status: result.describe(),
    }
}
