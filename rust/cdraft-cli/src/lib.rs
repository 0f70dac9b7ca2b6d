//! Command dispatch and interactive session for the cdraft shell.

pub mod colors;
pub mod commands;
pub mod handlers;
pub mod prompt;
pub mod repl;
