// Recording command runner used by the action and dispatcher tests.

use super::runner::{CommandRunner, Invocation, InvocationResult};
use crate::error::{AppError, Result};
use std::collections::HashMap;
use std::io;
use std::sync::Arc;

/// Records every invocation and answers with scripted results (exit 0 by default).
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub calls: Vec<Invocation>,
    responses: HashMap<String, InvocationResult>,
    unspawnable: Vec<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command_line` (with or without an elevation prefix) with `result`.
    pub fn respond(mut self, command_line: &str, result: InvocationResult) -> Self {
        self.responses.insert(command_line.to_string(), result);
        self
    }

    /// Make every invocation of `program` fail to start.
    pub fn unspawnable(mut self, program: &str) -> Self {
        self.unspawnable.push(program.to_string());
        self
    }

    /// Command lines run so far, as displayed.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.iter().map(ToString::to_string).collect()
    }

    fn response_for(&self, line: &str) -> InvocationResult {
        self.responses
            .iter()
            .find(|(key, _)| line == key.as_str() || line.ends_with(&format!(" {}", key)))
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| InvocationResult::exited(0))
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<InvocationResult> {
        self.calls.push(invocation.clone());
        if self.unspawnable.contains(&invocation.program) {
            return Err(AppError::Io(Arc::new(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: not found", invocation.program),
            ))));
        }
        Ok(self.response_for(&invocation.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_runner_matches_elevated_commands() {
        let mut runner =
            RecordingRunner::new().respond("pacman -Qtdq", InvocationResult::exited(1));

        let plain = runner.run(&Invocation::new("pacman", ["-Qtdq"])).unwrap();
        let elevated = runner
            .run(&Invocation::new("pacman", ["-Qtdq"]).elevated_with("sudo"))
            .unwrap();
        let other = runner.run(&Invocation::new("pacman", ["-Syu"])).unwrap();

        assert_eq!(plain.code, Some(1));
        assert_eq!(elevated.code, Some(1));
        assert!(other.success());
        assert_eq!(runner.calls.len(), 3);
    }
}
