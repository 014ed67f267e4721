//! Runs external commands and reports their exit status as plain data.
//!
//! Actions never touch `std::process` directly; they build an [`Invocation`]
//! and hand it to a [`CommandRunner`], which keeps them testable with a
//! recording runner.

use crate::error::Result;
use std::fmt;
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info};

/// How the child's standard output is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// The child writes straight to the terminal.
    Inherit,
    /// Stdout is collected into [`InvocationResult::stdout`].
    Capture,
}

/// One external command line, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub output: OutputMode,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            output: OutputMode::Inherit,
        }
    }

    /// Collect stdout instead of letting it reach the terminal.
    pub fn captured(mut self) -> Self {
        self.output = OutputMode::Capture;
        self
    }

    /// Prefix the command line with an elevation helper such as `sudo`.
    pub fn elevated_with(self, helper: &str) -> Self {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: helper.to_string(),
            args,
            output: self.output,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Exit information of a finished invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationResult {
    /// Exit code, `None` when the child was killed by a signal.
    pub code: Option<i32>,
    /// Terminating signal on Unix.
    pub signal: Option<i32>,
    /// Captured stdout; empty for inherited output.
    pub stdout: String,
}

impl InvocationResult {
    #[cfg(test)]
    pub fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn with_stdout(code: i32, stdout: &str) -> Self {
        Self {
            code: Some(code),
            signal: None,
            stdout: stdout.to_string(),
        }
    }

    #[cfg(test)]
    pub fn killed(signal: i32) -> Self {
        Self {
            code: None,
            signal: Some(signal),
            stdout: String::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human-readable status for failure messages.
    pub fn describe(&self) -> String {
        match (self.code, self.signal) {
            (Some(code), _) => format!("exited with code {}", code),
            (None, Some(signal)) => format!("was terminated by signal {}", signal),
            (None, None) => "ended with an unknown status".to_string(),
        }
    }

    fn from_status(status: ExitStatus, stdout: String) -> Self {
        Self {
            code: status.code(),
            signal: terminating_signal(&status),
            stdout,
        }
    }
}

#[cfg(unix)]
fn terminating_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn terminating_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

/// Executes invocations to completion, one at a time.
pub trait CommandRunner {
    /// Run the invocation and wait for it. Errors only when the process could not be started.
    fn run(&mut self, invocation: &Invocation) -> Result<InvocationResult>;
}

/// Runs invocations as real child processes.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<InvocationResult> {
        info!("Running `{}`", invocation);

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);

        let result = match invocation.output {
            OutputMode::Inherit => {
                let status = command.status()?;
                InvocationResult::from_status(status, String::new())
            },
            OutputMode::Capture => {
                let output = command.stderr(Stdio::inherit()).output()?;
                let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                InvocationResult::from_status(output.status, stdout)
            },
        };

        debug!("`{}` {}", invocation, result.describe());
        Ok(result)
    }
}
