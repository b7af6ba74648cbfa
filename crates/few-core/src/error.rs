//! Error types for few-core

use std::path::PathBuf;

/// Result type for few-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in few-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Package token could not be resolved to a remote
    #[error("Invalid package identifier '{token}': {reason}")]
    InvalidIdentifier { token: String, reason: String },

    /// A different remote already occupies this package name in the cache
    #[error(
        "Package name '{name}' is already cached from {existing}; refusing to replace it with {requested}"
    )]
    NameCollision {
        name: String,
        existing: String,
        requested: String,
    },

    /// Initial clone of a package failed; no cache entry was left behind
    #[error("Failed to fetch '{name}' from {url}: {source}")]
    FetchError {
        name: String,
        url: String,
        #[source]
        source: few_git::Error,
    },

    /// Existing cache entry could not be updated (reported as a warning)
    #[error("Failed to update cached '{name}', using existing copy: {source}")]
    SyncError {
        name: String,
        #[source]
        source: few_git::Error,
    },

    /// Manifest exists but is not well-formed
    #[error("Invalid manifest {path}: {message}")]
    ManifestError { path: PathBuf, message: String },

    /// Version-control client is not usable
    #[error("Version control client unavailable: {source}")]
    PreflightError {
        #[source]
        source: few_git::Error,
    },

    /// Copying a cache entry into the project failed
    #[error("Failed to materialize '{name}' into {path}: {source}")]
    MaterializeError {
        name: String,
        path: PathBuf,
        #[source]
        source: few_fs::Error,
    },

    /// No home directory to place the default cache root in
    #[error("Could not determine the home directory; set FEW_HOME or pass --cache-root")]
    HomeNotFound,

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from few-fs
    #[error(transparent)]
    Fs(#[from] few_fs::Error),

    /// Version-control error from few-git
    #[error(transparent)]
    Git(#[from] few_git::Error),
}

impl Error {
    pub(crate) fn invalid(token: &str, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error rejects the package token itself.
    ///
    /// Name collisions count: the token resolved, but to a name that is
    /// already taken by another remote.
    pub fn is_invalid_identifier(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier { .. } | Self::NameCollision { .. }
        )
    }
}
