//! Error types for few-git

use std::path::PathBuf;

/// Result type for few-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in few-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] few_fs::Error),

    #[error("'{program}' could not be run: {message}")]
    ClientUnavailable { program: String, message: String },

    #[error("`{command}` failed (exit code {code}): {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    #[error("Failed to update {path}: {message}")]
    PullFailed { path: PathBuf, message: String },

    #[error("Cannot fast-forward {path}: {message}")]
    CannotFastForward { path: PathBuf, message: String },

    #[error("Not a git repository: {path}")]
    NotARepository { path: PathBuf },
}
