//! Working-tree status DTOs.
//!
//! One repository path may yield two `FileStatus` rows: one `staged` (index
//! vs HEAD) and one unstaged (working tree vs index).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    /// Path relative to the repository root, `/`-separated
    pub path: String,
    pub status: StatusCode,
    pub staged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCode {
    Modified,
    Added,
    Deleted,
    Renamed,
    Untracked,
}

impl StatusCode {
    /// Single-letter code as shown by porcelain status output.
    pub fn as_letter(&self) -> char {
        match self {
            StatusCode::Modified => 'M',
            StatusCode::Added => 'A',
            StatusCode::Deleted => 'D',
            StatusCode::Renamed => 'R',
            StatusCode::Untracked => '?',
        }
    }
}
