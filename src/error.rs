//! Error tiers and the process exit codes they map to.
//!
//! Anything the operator can fix by editing the configuration or the input
//! table is a [`UserError`] and exits with [`EXIT_USER_ERROR`]. Every other
//! failure (I/O, serialization, bugs) exits with [`EXIT_APPLICATION_ERROR`].

use std::path::PathBuf;

use thiserror::Error;

pub const EXIT_USER_ERROR: i32 = 1;
pub const EXIT_APPLICATION_ERROR: i32 = 2;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Missing required configuration parameters: {}", .0.join(", "))]
    MissingParameters(Vec<String>),
    #[error("Missing required image parameters: {}", .0.join(", "))]
    MissingImageParameters(Vec<String>),
    #[error("Parameter '{name}' is invalid: {reason}")]
    InvalidParameter { name: String, reason: String },
    #[error("Unsupported action '{0}'")]
    UnsupportedAction(String),
    #[error("Configuration file {path:?} is not valid: {reason}")]
    InvalidConfigFile { path: PathBuf, reason: String },
    #[error("Input table '{name}' not found at {path:?}")]
    MissingInputTable { name: String, path: PathBuf },
    #[error("Input table {0:?} has no header row")]
    MissingHeader(PathBuf),
    #[error("Row {row} has {found} field(s) but the header declares {expected}")]
    ExtraFields {
        row: u64,
        expected: usize,
        found: usize,
    },
    #[error("Row {row} could not be parsed: {reason}")]
    MalformedRecord { row: u64, reason: String },
}

/// Resolves the exit code for a failed run.
///
/// `anyhow` downcasting looks through `.context(...)` layers, so a
/// [`UserError`] wrapped by callers is still recognised.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if is_user_error(err) {
        EXIT_USER_ERROR
    } else {
        EXIT_APPLICATION_ERROR
    }
}

pub fn is_user_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<UserError>().is_some()
        || err.chain().any(|cause| cause.is::<UserError>())
}
