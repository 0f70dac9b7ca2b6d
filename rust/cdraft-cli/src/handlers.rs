//! Command handlers.
//!
//! The header, macro, and global families are the same five operations over
//! one shared fragments abstraction; functions and the build commands get
//! their own handlers. Handlers report recoverable failures (editor,
//! compiler, run target, copy) where they happen and keep the session
//! alive; an `Err` return means the argument was invalid and nothing was
//! mutated.

use std::path::Path;

use cdraft_core::document::{DocumentError, Fragments};
use cdraft_core::editor;
use cdraft_core::pipeline::{discard, Pipeline, PipelineError};
use cdraft_core::toolchain;

use crate::colors::{gray, green, red, status_label};
use crate::commands::{CommandError, CommandSet, Flow, Session};
use crate::prompt::{Prompter, PROMPT_ASK, PROMPT_EDIT};

// ---------------------------------------------------------------------------
// Shared plumbing
// ---------------------------------------------------------------------------

/// Resolve an index over `menu.len()` entries: parse `arg` when given,
/// otherwise show the numbered menu and ask. Never mutates on failure.
fn resolve_index(
    arg: &str,
    menu: &[String],
    prompter: &mut dyn Prompter,
) -> Result<usize, CommandError> {
    let raw = if arg.is_empty() {
        println!("Choose:");
        for line in menu {
            println!("{line}");
        }
        match prompter.read_line(PROMPT_ASK) {
            Some(line) => line,
            None => return Err(CommandError::Invalid("no selection".to_string())),
        }
    } else {
        arg.to_string()
    };
    let raw = raw.trim();
    let index: usize = raw
        .parse()
        .map_err(|_| CommandError::Invalid(format!("invalid selection '{raw}'")))?;
    if index >= menu.len() {
        return Err(CommandError::Invalid(format!(
            "index {index} is out of range (0..{})",
            menu.len()
        )));
    }
    Ok(index)
}

fn fragment_menu(list: &Fragments) -> Vec<String> {
    list.iter()
        .enumerate()
        .map(|(i, entry)| format!("  {}. {}", i, entry.text))
        .collect()
}

fn add_fragment(list: &mut Fragments, text: &str) -> Result<Flow, CommandError> {
    match list.add(text) {
        Ok(()) => Ok(Flow::Continue),
        Err(DocumentError::Duplicate) => {
            println!("Item already present");
            Ok(Flow::Continue)
        }
        Err(err) => Err(CommandError::Invalid(err.to_string())),
    }
}

fn remove_fragment(
    list: &mut Fragments,
    arg: &str,
    prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    let menu = fragment_menu(list);
    let index = resolve_index(arg, &menu, prompter)?;
    list.remove(index)
        .map_err(|err| CommandError::Invalid(err.to_string()))?;
    Ok(Flow::Continue)
}

fn modify_fragment(
    list: &mut Fragments,
    arg: &str,
    prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    let menu = fragment_menu(list);
    let index = resolve_index(arg, &menu, prompter)?;
    let text = prompter
        .read_line(PROMPT_EDIT)
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .ok_or_else(|| CommandError::Invalid("no replacement text".to_string()))?;
    list.replace(index, &text)
        .map_err(|err| CommandError::Invalid(err.to_string()))?;
    Ok(Flow::Continue)
}

fn report(err: &PipelineError) {
    eprintln!("{} {}", red("error:"), err);
}

fn print_warnings(warnings: &str) {
    for line in warnings.lines() {
        eprintln!("{}", gray(line));
    }
}

// ---------------------------------------------------------------------------
// Session commands
// ---------------------------------------------------------------------------

pub fn help(
    _session: &mut Session,
    arg: &str,
    set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    if arg.is_empty() {
        println!("Usage: command [argument]");
        println!("Commands:");
        let width = set.iter().map(|c| c.usage().len()).max().unwrap_or(0);
        for spec in set.iter() {
            println!("  {:<width$}  {}", spec.usage(), spec.description);
        }
        return Ok(Flow::Continue);
    }
    match set.find(arg) {
        Some(spec) => {
            println!("{}  {}", spec.usage(), spec.description);
            Ok(Flow::Continue)
        }
        None => Err(CommandError::Invalid(format!("unknown command '{arg}'"))),
    }
}

pub fn quit(
    _session: &mut Session,
    _arg: &str,
    _set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    Ok(Flow::Quit)
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

pub fn add_header(
    session: &mut Session,
    arg: &str,
    _set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    add_fragment(&mut session.document.headers, arg)
}

pub fn remove_header(
    session: &mut Session,
    arg: &str,
    _set: &CommandSet,
    prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    remove_fragment(&mut session.document.headers, arg, prompter)
}

pub fn modify_header(
    session: &mut Session,
    arg: &str,
    _set: &CommandSet,
    prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    modify_fragment(&mut session.document.headers, arg, prompter)
}

pub fn clear_headers(
    session: &mut Session,
    _arg: &str,
    _set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    session.document.headers.clear();
    Ok(Flow::Continue)
}

pub fn list_headers(
    session: &mut Session,
    _arg: &str,
    _set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    println!("Defined headers:");
    for (i, entry) in session.document.headers.iter().enumerate() {
        let marker = if entry.builtin {
            format!(" {}", gray("[built-in]"))
        } else {
            String::new()
        };
        println!("  {}. #include {}{}", i, entry.text, marker);
    }
    Ok(Flow::Continue)
}

// ---------------------------------------------------------------------------
// Macros
// ---------------------------------------------------------------------------

pub fn add_macro(
    session: &mut Session,
    arg: &str,
    _set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    add_fragment(&mut session.document.macros, arg)
}

pub fn remove_macro(
    session: &mut Session,
    arg: &str,
    _set: &CommandSet,
    prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    remove_fragment(&mut session.document.macros, arg, prompter)
}

pub fn modify_macro(
    session: &mut Session,
    arg: &str,
    _set: &CommandSet,
    prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    modify_fragment(&mut session.document.macros, arg, prompter)
}

pub fn clear_macros(
    session: &mut Session,
    _arg: &str,
    _set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    session.document.macros.clear();
    Ok(Flow::Continue)
}

pub fn list_macros(
    session: &mut Session,
    _arg: &str,
    _set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    println!("Defined macros:");
    for (i, entry) in session.document.macros.iter().enumerate() {
        println!("  {}. #define {}", i, entry.text);
    }
    Ok(Flow::Continue)
}

// ---------------------------------------------------------------------------
// Globals
// ---------------------------------------------------------------------------

pub fn add_global(
    session: &mut Session,
    arg: &str,
    _set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    add_fragment(&mut session.document.globals, arg)
}

pub fn remove_global(
    session: &mut Session,
    arg: &str,
    _set: &CommandSet,
    prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    remove_fragment(&mut session.document.globals, arg, prompter)
}

pub fn modify_global(
    session: &mut Session,
    arg: &str,
    _set: &CommandSet,
    prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    modify_fragment(&mut session.document.globals, arg, prompter)
}

pub fn clear_globals(
    session: &mut Session,
    _arg: &str,
    _set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    session.document.globals.clear();
    Ok(Flow::Continue)
}

pub fn list_globals(
    session: &mut Session,
    _arg: &str,
    _set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    println!("Defined globals:");
    for (i, entry) in session.document.globals.iter().enumerate() {
        println!("  {}. {}", i, entry.text);
    }
    Ok(Flow::Continue)
}

// ---------------------------------------------------------------------------
// Functions
// ---------------------------------------------------------------------------

pub fn define_function(
    session: &mut Session,
    arg: &str,
    _set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    define_function_with(session, arg, &toolchain::editor_program())
}

/// Same as `define_function`, with the editor program passed explicitly.
pub fn define_function_with(
    session: &mut Session,
    arg: &str,
    editor: &str,
) -> Result<Flow, CommandError> {
    let func = session.document.functions.resolve_mut(arg);
    match editor::edit_with(editor, &func.body) {
        Ok(body) => func.body = body,
        // Recoverable: the body stays as it was.
        Err(err) => eprintln!("{} {}", red("error:"), err),
    }
    Ok(Flow::Continue)
}

pub fn remove_function(
    session: &mut Session,
    arg: &str,
    _set: &CommandSet,
    prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    let menu: Vec<String> = session
        .document
        .functions
        .iter()
        .enumerate()
        .map(|(i, func)| format!("  {}. {}", i, func.prototype))
        .collect();
    let index = resolve_index(arg, &menu, prompter)?;
    session
        .document
        .functions
        .remove(index)
        .map_err(|err| CommandError::Invalid(err.to_string()))?;
    Ok(Flow::Continue)
}

pub fn clear_functions(
    session: &mut Session,
    _arg: &str,
    _set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    session.document.functions.clear();
    Ok(Flow::Continue)
}

pub fn list_functions(
    session: &mut Session,
    _arg: &str,
    _set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    println!("Defined functions:");
    for (i, func) in session.document.functions.iter().enumerate() {
        let state = if func.body.is_empty() {
            "body not defined"
        } else {
            "body defined"
        };
        println!("  {}. {} - {}", i, func.prototype, state);
    }
    Ok(Flow::Continue)
}

// ---------------------------------------------------------------------------
// Build commands
// ---------------------------------------------------------------------------

pub fn check(
    session: &mut Session,
    _arg: &str,
    _set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    let pipeline = Pipeline::from_env();
    let source = match pipeline.write_source(&session.document) {
        Ok(source) => source,
        Err(err) => {
            report(&err);
            return Ok(Flow::Continue);
        }
    };
    println!("{} with {}", status_label("Checking"), pipeline.cc());
    match pipeline.compile(source.path()) {
        Ok(built) => {
            print_warnings(&built.warnings);
            println!("{} no errors found", green("ok:"));
            discard(built.artifact);
        }
        Err(err) => report(&err),
    }
    discard(source.into_temp_path());
    Ok(Flow::Continue)
}

pub fn preview(
    session: &mut Session,
    _arg: &str,
    _set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    let pipeline = Pipeline::from_env();
    match pipeline.render(&session.document) {
        Ok(text) => {
            println!("Document:");
            println!("{}", "-".repeat(72));
            for (i, line) in text.lines().enumerate() {
                println!("{:>3}  {}", i, line);
            }
        }
        Err(err) => report(&err),
    }
    Ok(Flow::Continue)
}

pub fn execute(
    session: &mut Session,
    arg: &str,
    _set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    let args = shell_words::split(arg)
        .map_err(|err| CommandError::Invalid(format!("bad argument string: {err}")))?;
    let pipeline = Pipeline::from_env();
    let source = match pipeline.write_source(&session.document) {
        Ok(source) => source,
        Err(err) => {
            report(&err);
            return Ok(Flow::Continue);
        }
    };
    println!("{} with {}", status_label("Compiling"), pipeline.cc());
    match pipeline.compile(source.path()) {
        Ok(built) => {
            print_warnings(&built.warnings);
            println!("{}", status_label("Running"));
            match pipeline.run(&built.artifact, &args) {
                Ok(status) if !status.success() => {
                    eprintln!("{} program exited with {}", red("error:"), status);
                }
                Ok(_) => {}
                Err(err) => report(&err),
            }
            discard(built.artifact);
        }
        Err(err) => report(&err),
    }
    discard(source.into_temp_path());
    Ok(Flow::Continue)
}

pub fn export(
    session: &mut Session,
    arg: &str,
    _set: &CommandSet,
    _prompter: &mut dyn Prompter,
) -> Result<Flow, CommandError> {
    let pipeline = Pipeline::from_env();
    match pipeline.export(&session.document, Path::new(arg)) {
        Ok(()) => println!("{} {}", status_label("Exported"), arg),
        Err(err) => report(&err),
    }
    Ok(Flow::Continue)
}
