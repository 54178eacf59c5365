//! Diff DTOs.
//!
//! - `FileDiff`: unified diff text for one path plus line statistics
//! - `DiffStats`: added/deleted (and reserved `modified`) line counts
//!
//! A binary `FileDiff` never carries content and always has zero stats.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiff {
    pub path: String,
    pub content: Option<String>,
    pub stats: DiffStats,
    pub is_binary: bool,
}

impl FileDiff {
    pub fn text(path: impl Into<String>, content: String, stats: DiffStats) -> Self {
        Self {
            path: path.into(),
            content: Some(content),
            stats,
            is_binary: false,
        }
    }

    pub fn binary(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: None,
            stats: DiffStats::default(),
            is_binary: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DiffStats {
    pub added: usize,
    pub deleted: usize,
    /// Reserved for word-level diffs; line diffs leave it at zero
    pub modified: usize,
}
