//! Core library for the cdraft shell.
//!
//! Holds the in-memory model of the C program under assembly and everything
//! that turns it into a running executable: the merger that serializes the
//! model to a single translation unit, the bridge to the user's text editor,
//! and the build pipeline that drives the external C compiler over scoped
//! temporary files.

pub mod document;
pub mod editor;
pub mod merge;
pub mod pipeline;
pub mod toolchain;

pub use document::{Document, DocumentError, Fragment, Fragments, Function, FunctionTable};
pub use editor::EditorError;
pub use pipeline::{Pipeline, PipelineError};
