//! Line-input abstraction for the interactive session.
//!
//! Handlers that need a follow-up line (index selections, replacement text)
//! read it through [`Prompter`] rather than stdin directly, so tests can
//! drive them with scripted input.

use std::collections::VecDeque;

/// Prompt for ordinary commands.
pub const PROMPT_MAIN: &str = ">> ";
/// Prompt for an index selection.
pub const PROMPT_ASK: &str = "?> ";
/// Prompt for replacement text.
pub const PROMPT_EDIT: &str = "*> ";

/// One line of user input per call; `None` means no more input.
pub trait Prompter {
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}

/// Canned input, consumed front to back. Used by tests.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    lines: VecDeque<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, _prompt: &str) -> Option<String> {
        self.lines.pop_front()
    }
}
