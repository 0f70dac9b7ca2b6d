//! Interactive session driver.
//!
//! Owns the session state and the rustyline editor, reads one line at a
//! time, and hands non-blank lines to the command table. End of input and
//! Ctrl-C both end the loop cleanly with a farewell; command-level failures
//! are reported and the loop keeps going.

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use crate::colors::{bold, cyan, gray, red};
use crate::commands::{CommandSet, Flow, Session};
use crate::prompt::{Prompter, PROMPT_MAIN};

struct ReadlinePrompter {
    rl: Editor<(), DefaultHistory>,
}

impl Prompter for ReadlinePrompter {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        match self.rl.readline(prompt) {
            Ok(line) => Some(line),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => None,
            Err(err) => {
                eprintln!("{} {}", red("error:"), err);
                None
            }
        }
    }
}

/// Run the interactive loop until quit, end of input, or interrupt.
pub fn run_session(commands: &CommandSet) {
    println!(
        "{}",
        bold(&cyan(&format!("cdraft {}", env!("CARGO_PKG_VERSION"))))
    );
    println!(
        "{}",
        gray("Type 'help' for available commands, 'quit' to leave.")
    );

    let config = rustyline::Config::builder().auto_add_history(true).build();
    let rl: Editor<(), DefaultHistory> = match Editor::with_config(config) {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("{} cannot initialize line editor: {}", red("error:"), err);
            return;
        }
    };
    let mut prompter = ReadlinePrompter { rl };
    let mut session = Session::new();

    loop {
        let Some(line) = prompter.read_line(PROMPT_MAIN) else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        match commands.dispatch(&mut session, &line, &mut prompter) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) => eprintln!("{} {}", red("error:"), err),
        }
    }

    println!("{}", cyan("Bye."));
}
