use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitInfo {
    pub hash: String,
    /// Full message, surrounding whitespace trimmed
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    /// Author time, seconds since the epoch
    pub timestamp: i64,
    pub relative_time: String,
    /// Empty for a root commit, two or more for merges
    pub parent_hashes: Vec<String>,
    /// True on every row of a page except possibly the last, which carries
    /// the look-ahead result
    pub has_more: bool,
}

/// Filter and pagination options for a history walk.
///
/// `offset_hash` (cursor) and `offset` (numeric skip) are alternative
/// pagination strategies; when both are set the cursor wins and `offset` is
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommitFilter {
    /// Local branch to start from
    pub branch: Option<String>,
    /// Commit to start from when no branch is given
    pub start_hash: Option<String>,
    /// Page size; 0 means unlimited
    pub limit: usize,
    pub offset: usize,
    /// Resume strictly after this commit
    pub offset_hash: Option<String>,
    /// Substring of author name or email (case-sensitive)
    pub author: Option<String>,
    /// Substring of the message (case-insensitive)
    pub search_query: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl CommitFilter {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn after(offset_hash: impl Into<String>, limit: usize) -> Self {
        Self {
            offset_hash: Some(offset_hash.into()),
            limit,
            ..Self::default()
        }
    }

    pub fn on_branch(branch: impl Into<String>, limit: usize) -> Self {
        Self {
            branch: Some(branch.into()),
            limit,
            ..Self::default()
        }
    }

    pub fn by_author(author: impl Into<String>, limit: usize) -> Self {
        Self {
            author: Some(author.into()),
            limit,
            ..Self::default()
        }
    }

    pub fn search(query: impl Into<String>, limit: usize) -> Self {
        Self {
            search_query: Some(query.into()),
            limit,
            ..Self::default()
        }
    }
}
