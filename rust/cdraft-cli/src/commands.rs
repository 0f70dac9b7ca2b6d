//! Table-driven command dispatch.
//!
//! The command table is built once, up front, and handed to the session
//! driver; nothing here is a process-wide singleton, so tests can run a
//! reduced set. Each command carries an [`Arity`] tag the engine checks
//! before the handler runs, turning shape mismatches into precise
//! invalid-argument reports.

use cdraft_core::document::Document;
use thiserror::Error;

use crate::prompt::Prompter;

/// Name printed in the unknown-command hint.
pub const HELP_COMMAND: &str = "help";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("{0}")]
    Invalid(String),
}

/// Whether a command consumes its textual argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    None,
    Optional,
    Required,
}

/// What the session loop should do after a command completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The mutable state a command acts on. Owned by the session driver;
/// handlers borrow it for one invocation and never retain it.
#[derive(Debug, Default)]
pub struct Session {
    pub document: Document,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}

pub type Handler =
    fn(&mut Session, &str, &CommandSet, &mut dyn Prompter) -> Result<Flow, CommandError>;

pub struct CommandSpec {
    pub name: &'static str,
    pub arity: Arity,
    pub description: &'static str,
    pub handler: Handler,
}

impl CommandSpec {
    /// Usage rendering driven by the arity tag.
    pub fn usage(&self) -> String {
        match self.arity {
            Arity::None => self.name.to_string(),
            Arity::Optional => format!("{} [arg]", self.name),
            Arity::Required => format!("{} arg", self.name),
        }
    }
}

/// Immutable-after-construction command table, ordered by registration.
pub struct CommandSet {
    commands: Vec<CommandSpec>,
}

impl CommandSet {
    pub fn new(commands: Vec<CommandSpec>) -> Self {
        Self { commands }
    }

    /// The full table of the interactive shell.
    pub fn default_set() -> Self {
        use crate::handlers::*;
        use Arity::{None, Optional, Required};

        macro_rules! cmd {
            ($name:literal, $arity:expr, $desc:literal, $handler:path) => {
                CommandSpec {
                    name: $name,
                    arity: $arity,
                    description: $desc,
                    handler: $handler,
                }
            };
        }

        Self::new(vec![
            cmd!("help", Optional, "Show commands, or one command's usage", help),
            cmd!("quit", None, "Leave the shell", quit),
            cmd!("exit", None, "Leave the shell", quit),
            cmd!("addh", Required, "Add a header (<> or \"\" required)", add_header),
            cmd!("rmh", Optional, "Remove the header at an index", remove_header),
            cmd!("modh", Optional, "Replace the header at an index", modify_header),
            cmd!("clh", None, "Reset headers to the built-ins", clear_headers),
            cmd!("llh", None, "List headers", list_headers),
            cmd!("defm", Required, "Define a macro (text after #define)", add_macro),
            cmd!("rmm", Optional, "Remove the macro at an index", remove_macro),
            cmd!("modm", Optional, "Replace the macro at an index", modify_macro),
            cmd!("clm", None, "Delete all macros", clear_macros),
            cmd!("llm", None, "List macros", list_macros),
            cmd!("addg", Required, "Add a global declaration (no ';')", add_global),
            cmd!("rmg", Optional, "Remove the global at an index", remove_global),
            cmd!("modg", Optional, "Replace the global at an index", modify_global),
            cmd!("clg", None, "Delete all globals", clear_globals),
            cmd!("llg", None, "List globals", list_globals),
            cmd!("def", Required, "Edit the function with this prototype", define_function),
            cmd!("rmf", Optional, "Remove the function at an index", remove_function),
            cmd!("clf", None, "Reset functions to main only", clear_functions),
            cmd!("llf", None, "List functions", list_functions),
            cmd!("prev", None, "Preview the merged source", preview),
            cmd!("exp", Required, "Export the merged source to a path", export),
            cmd!("chk", None, "Compile to surface diagnostics", check),
            cmd!("exec", Optional, "Compile and run with arguments", execute),
        ])
    }

    pub fn find(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.iter()
    }

    /// Dispatch one line of input: first whitespace token is the command
    /// name, the trimmed remainder its raw argument. Unknown names are a
    /// printed outcome, not an error.
    pub fn dispatch(
        &self,
        session: &mut Session,
        line: &str,
        prompter: &mut dyn Prompter,
    ) -> Result<Flow, CommandError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Flow::Continue);
        }
        let mut parts = trimmed.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or("");
        let arg = parts.next().map(str::trim).unwrap_or("");

        let Some(spec) = self.find(name) else {
            println!(
                "Invalid command '{}', see '{}' for more info",
                name, HELP_COMMAND
            );
            return Ok(Flow::Continue);
        };
        match spec.arity {
            Arity::Required if arg.is_empty() => {
                return Err(CommandError::Invalid(format!(
                    "'{}' requires an argument, see '{} {}'",
                    name, HELP_COMMAND, name
                )));
            }
            Arity::None if !arg.is_empty() => {
                return Err(CommandError::Invalid(format!(
                    "'{}' takes no argument",
                    name
                )));
            }
            _ => {}
        }
        (spec.handler)(session, arg, self, prompter)
    }
}
