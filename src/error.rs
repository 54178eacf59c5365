//! Application error types.
//!
//! Defines `AppError` for every failure the panel core can surface, plus the
//! `GitContext` extension that attaches the failing operation and path to
//! libgit2 and filesystem errors so messages are user-displayable.
//!
//! Recoverable conditions (cursor hash never found, limit reached, binary
//! content) are not errors and never appear here.

use std::path::Path;

use thiserror::Error;

use crate::models::Revision;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Failed to {operation} {path}: {source}")]
    Operation {
        operation: &'static str,
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a git repository: {0}")]
    NotARepository(String),

    #[error("Repository is bare and has no working tree: {0}")]
    BareRepository(String),

    #[error("Directory is already a git repository: {0}")]
    AlreadyExists(String),

    #[error("Reference not found: {0}")]
    ReferenceNotFound(String),

    #[error("Path not found in {revision}: {path}")]
    PathNotFoundInRevision { path: String, revision: Revision },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl AppError {
    pub fn io(operation: &'static str, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        AppError::Io {
            operation,
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn not_found(path: impl Into<String>, revision: Revision) -> Self {
        AppError::PathNotFoundInRevision {
            path: path.into(),
            revision,
        }
    }

    /// True for the "nothing there" family: a missing path or missing HEAD.
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            AppError::PathNotFoundInRevision { .. } | AppError::ReferenceNotFound(_)
        )
    }
}

/// Attach operation + path context to a lower-level failure.
pub trait GitContext<T> {
    fn context(self, operation: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> GitContext<T> for std::result::Result<T, git2::Error> {
    fn context(self, operation: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| AppError::Operation {
            operation,
            path: path.as_ref().display().to_string(),
            source,
        })
    }
}

impl<T> GitContext<T> for std::result::Result<T, std::io::Error> {
    fn context(self, operation: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| AppError::io(operation, path, source))
    }
}

/// HEAD is unborn (no commits yet) or missing entirely.
pub(crate) fn is_unborn(err: &git2::Error) -> bool {
    matches!(
        err.code(),
        git2::ErrorCode::UnbornBranch | git2::ErrorCode::NotFound
    )
}

pub type Result<T> = std::result::Result<T, AppError>;
