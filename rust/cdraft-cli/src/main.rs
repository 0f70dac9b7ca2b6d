//! cdraft — write a small C program using a quick and easy command prompt.

use clap::Parser;

use cdraft_cli::commands::CommandSet;
use cdraft_cli::repl;

#[derive(Parser)]
#[command(
    name = "cdraft",
    version,
    about = "Write a small C program using a quick and easy command prompt",
    after_help = "For help on commands, enter 'help' in the command prompt."
)]
struct Cli {}

fn main() {
    let _cli = Cli::parse();
    let commands = CommandSet::default_set();
    repl::run_session(&commands);
}
