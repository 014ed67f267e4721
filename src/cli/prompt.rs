use crate::error::Result;
use dialoguer::{theme::ColorfulTheme, Input};
use std::io::{self, BufRead, IsTerminal, Write};

/// Source of menu selections and confirmation answers.
pub trait Prompter {
    /// Read one menu selection. `None` means input is closed.
    fn read_selection(&mut self) -> Result<Option<String>>;

    /// Ask a yes/no question; an empty answer yields `default`.
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;
}

/// Only `y`/`Y` is an affirmative; an empty reply takes the configured default.
pub fn interpret_answer(answer: &str, default: bool) -> bool {
    match answer.trim() {
        "y" | "Y" => true,
        "" => default,
        _ => false,
    }
}

/// Prompts on the terminal with `dialoguer`, or reads plain lines when stdin is piped.
pub struct TerminalPrompter {
    tty: bool,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            tty: io::stdin().is_terminal(),
        }
    }

    fn ask(&self, prompt: &str) -> Result<Option<String>> {
        if self.tty {
            let answer = Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text();
            return match answer {
                Ok(line) => Ok(Some(line)),
                Err(dialoguer::Error::IO(e))
                    if matches!(
                        e.kind(),
                        io::ErrorKind::UnexpectedEof | io::ErrorKind::Interrupted
                    ) =>
                {
                    Ok(None)
                },
                Err(e) => Err(e.into()),
            };
        }

        print!("{}: ", prompt);
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn read_selection(&mut self) -> Result<Option<String>> {
        self.ask("Select an option")
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let answer = self.ask(&format!("{} {}", question, hint))?;
        Ok(interpret_answer(answer.as_deref().unwrap_or(""), default))
    }
}
