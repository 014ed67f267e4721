// Scripted prompter for driving the dispatcher without a terminal.

use super::prompt::{interpret_answer, Prompter};
use crate::error::Result;
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    selections: VecDeque<String>,
    answers: VecDeque<String>,
    /// Every confirmation question asked, in order.
    pub questions: Vec<String>,
    /// Number of times the menu prompt was shown.
    pub selection_prompts: usize,
}

impl ScriptedPrompter {
    pub fn new(selections: &[&str]) -> Self {
        Self {
            selections: selections.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn answering(mut self, answers: &[&str]) -> Self {
        self.answers = answers.iter().map(|s| s.to_string()).collect();
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn read_selection(&mut self) -> Result<Option<String>> {
        self.selection_prompts += 1;
        Ok(self.selections.pop_front())
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        self.questions.push(question.to_string());
        let answer = self.answers.pop_front().unwrap_or_default();
        Ok(interpret_answer(&answer, default))
    }
}
