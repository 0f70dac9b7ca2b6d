//! Bridge to the user's text editor.
//!
//! A function body is written to a scoped temporary file, the editor is run
//! on it synchronously, and the file's final contents come back. The file is
//! removed on every path; callers keep the original text when the editor
//! fails.

use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("cannot start editor '{editor}': {source}")]
    Spawn {
        editor: String,
        source: std::io::Error,
    },
    #[error("editor '{editor}' exited with {status}")]
    Exit {
        editor: String,
        status: std::process::ExitStatus,
    },
    #[error("scratch file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Edit `initial` with an explicit editor program. Callers resolve the
/// program per invocation, typically via [`crate::toolchain::editor_program`].
pub fn edit_with(editor: &str, initial: &str) -> Result<String, EditorError> {
    let mut scratch = NamedTempFile::new()?;
    scratch.write_all(initial.as_bytes())?;
    scratch.flush()?;

    let status = Command::new(editor)
        .arg(scratch.path())
        .status()
        .map_err(|source| EditorError::Spawn {
            editor: editor.to_string(),
            source,
        })?;
    if !status.success() {
        return Err(EditorError::Exit {
            editor: editor.to_string(),
            status,
        });
    }

    let edited = std::fs::read_to_string(scratch.path())?;
    if let Err(err) = scratch.close() {
        eprintln!("warning: could not remove scratch file: {err}");
    }
    Ok(edited)
}
