//! Repository inspection and diff engine behind an editor's source-control
//! panel.
//!
//! - `git`: repository handle plus status, content, diff and history
//!   components, each an `impl GitRepository` block
//! - `models`: value objects returned to callers
//! - `service`: per-call facade that opens a fresh handle for every operation
//! - `error`: `AppError` and context helpers

pub mod error;
pub mod git;
pub mod models;
pub mod service;

pub use error::{AppError, Result};
pub use git::{CommitWalk, GitRepository, GitignoreFilter, IgnorePredicate, NoIgnore};
pub use service::GitService;
