//! Resolution of the external programs the shell drives.
//!
//! Both programs come from the environment and are re-read at every use, so
//! changing `$EDITOR` mid-session takes effect on the next command.

/// Variable naming the editor program.
pub const EDITOR_ENV: &str = "EDITOR";
/// Variable overriding the C compiler program.
pub const CC_ENV: &str = "CDRAFT_CC";

pub const DEFAULT_EDITOR: &str = "vi";
pub const DEFAULT_CC: &str = "gcc";

/// Pick `configured` unless it is unset or blank.
fn resolve_program(configured: Option<&str>, default: &str) -> String {
    configured
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Editor program for the current invocation.
pub fn editor_program() -> String {
    resolve_program(std::env::var(EDITOR_ENV).ok().as_deref(), DEFAULT_EDITOR)
}

/// C compiler program for the current invocation.
pub fn cc_program() -> String {
    resolve_program(std::env::var(CC_ENV).ok().as_deref(), DEFAULT_CC)
}
