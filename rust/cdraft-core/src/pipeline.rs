//! Build pipeline: merged source text → external C compiler → artifact.
//!
//! Every file the pipeline touches is a scoped temporary (`tempfile`), so
//! deletion happens on every exit path, including compiler failures. A named
//! artifact only escapes this module wrapped in a [`tempfile::TempPath`],
//! which removes it when dropped.

use std::io::Write;
use std::path::Path;
use std::process::Command;

use tempfile::{Builder, NamedTempFile, TempPath};
use thiserror::Error;

use crate::document::Document;
use crate::merge;
use crate::toolchain;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot start compiler '{cc}': {source}")]
    Spawn {
        cc: String,
        source: std::io::Error,
    },
    #[error("compiler reported errors:\n{stderr}")]
    Compile { stderr: String },
    #[error("cannot run '{program}': {source}")]
    Run {
        program: String,
        source: std::io::Error,
    },
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// A successfully built executable. The artifact file lives only as long as
/// this value; compiler warnings (if any) ride along for reporting.
#[derive(Debug)]
pub struct BuildOutput {
    pub artifact: TempPath,
    pub warnings: String,
}

/// Drives the external compiler named by `$CDRAFT_CC` (default `gcc`).
pub struct Pipeline {
    cc: String,
}

impl Pipeline {
    pub fn from_env() -> Self {
        Self {
            cc: toolchain::cc_program(),
        }
    }

    /// Use an explicit compiler program instead of the environment.
    pub fn with_compiler(cc: &str) -> Self {
        Self { cc: cc.to_string() }
    }

    pub fn cc(&self) -> &str {
        &self.cc
    }

    /// Serialize `doc` into a scoped `.c` file.
    pub fn write_source(&self, doc: &Document) -> Result<NamedTempFile, PipelineError> {
        let mut source = Builder::new().prefix("cdraft-").suffix(".c").tempfile()?;
        source.write_all(merge::merge(doc).as_bytes())?;
        source.flush()?;
        Ok(source)
    }

    /// Compile `src` with strict warnings, language forced to C. On failure
    /// the half-made output file is already gone when this returns.
    pub fn compile(&self, src: &Path) -> Result<BuildOutput, PipelineError> {
        let artifact = Builder::new()
            .prefix("cdraft-")
            .suffix(".out")
            .tempfile()?
            .into_temp_path();
        let output = Command::new(&self.cc)
            .args(["-Wall", "-x", "c"])
            .arg(src)
            .arg("-o")
            .arg(artifact.as_os_str())
            .output()
            .map_err(|source| PipelineError::Spawn {
                cc: self.cc.clone(),
                source,
            })?;
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(PipelineError::Compile { stderr });
        }
        Ok(BuildOutput {
            artifact,
            warnings: stderr,
        })
    }

    /// Merge and read the result back through a scoped temp file, for
    /// preview rendering.
    pub fn render(&self, doc: &Document) -> Result<String, PipelineError> {
        let source = self.write_source(doc)?;
        let text = std::fs::read_to_string(source.path())?;
        discard(source.into_temp_path());
        Ok(text)
    }

    /// Merge and copy the resulting source file to `dest`.
    pub fn export(&self, doc: &Document, dest: &Path) -> Result<(), PipelineError> {
        let source = self.write_source(doc)?;
        std::fs::copy(source.path(), dest)?;
        discard(source.into_temp_path());
        Ok(())
    }

    /// Run `program` synchronously with the session's standard streams.
    pub fn run(
        &self,
        program: &Path,
        args: &[String],
    ) -> Result<std::process::ExitStatus, PipelineError> {
        Command::new(program)
            .args(args)
            .status()
            .map_err(|source| PipelineError::Run {
                program: program.display().to_string(),
                source,
            })
    }
}

/// Best-effort removal. A leftover scratch file never fails the session, but
/// it is worth a warning.
pub fn discard(path: TempPath) {
    if let Err(err) = path.close() {
        eprintln!("warning: could not remove scratch file: {err}");
    }
}
