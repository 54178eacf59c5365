//! Working-tree status with staged/unstaged classification.
//!
//! libgit2 compares HEAD, index and working tree in one pass; each changed
//! path then yields up to two rows:
//! - a staged row when the index differs from HEAD
//! - an unstaged row when the working tree differs from the index
//!
//! Untracked paths yield a single unstaged `Untracked` row. A row whose path
//! the ignore predicate rejects is dropped.

use git2::{Status, StatusEntry, StatusOptions};

use crate::error::{GitContext, Result};
use crate::git::ignore::IgnorePredicate;
use crate::git::repository::GitRepository;
use crate::models::{FileStatus, StatusCode};

impl GitRepository {
    pub fn get_status(&self, ignore: &dyn IgnorePredicate) -> Result<Vec<FileStatus>> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .include_unmodified(false)
            .renames_head_to_index(true);

        let statuses = self.repo.statuses(Some(&mut opts)).context("read status of", &self.root)?;

        let mut files = Vec::new();
        let mut skipped = 0usize;

        let prepared = ignore.prepare(&self.root);
        let ignore: &dyn IgnorePredicate = prepared.as_deref().unwrap_or(ignore);

        for entry in statuses.iter() {
            let status = entry.status();
            if status.is_empty() || status.contains(Status::IGNORED) {
                continue;
            }

            for row in classify(&entry, status) {
                if ignore.is_ignored(&self.root, &self.root.join(&row.path)) {
                    skipped += 1;
                } else {
                    files.push(row);
                }
            }
        }

        tracing::debug!(
            "Status for {}: {} rows ({} rows ignored)",
            self.root.display(),
            files.len(),
            skipped
        );

        Ok(files)
    }

    /// Raw libgit2 status flags for a single path.
    pub fn path_status(&self, path: &str) -> Result<Status> {
        match self.repo.status_file(std::path::Path::new(path)) {
            Ok(status) => Ok(status),
            Err(err) if err.code() == git2::ErrorCode::NotFound => Ok(Status::CURRENT),
            Err(err) => Err(err).context("read status of", path),
        }
    }
}

/// Present only in the working tree: neither HEAD nor the index know the
/// path. A staged delete followed by recreating the file is not untracked.
pub(crate) fn is_untracked(status: Status) -> bool {
    status.contains(Status::WT_NEW) && !status.intersects(index_flags())
}

/// Rows for one status entry, staged first. Each row carries the path it
/// describes on its own side: a staged rename and the working-tree change on
/// top of it both name the new path.
fn classify(entry: &StatusEntry<'_>, status: Status) -> Vec<FileStatus> {
    let path = entry_path(entry);

    if is_untracked(status) {
        return vec![FileStatus {
            path,
            status: StatusCode::Untracked,
            staged: false,
        }];
    }

    let mut rows = Vec::with_capacity(2);

    if let Some(code) = staged_code(status) {
        let staged_path = entry
            .head_to_index()
            .and_then(|delta| delta.new_file().path().map(normalize))
            .unwrap_or_else(|| path.clone());

        rows.push(FileStatus {
            path: staged_path,
            status: code,
            staged: true,
        });
    }

    if let Some(code) = unstaged_code(status) {
        let workdir_path = entry
            .index_to_workdir()
            .and_then(|delta| delta.new_file().path().map(normalize))
            .unwrap_or(path);

        rows.push(FileStatus {
            path: workdir_path,
            status: code,
            staged: false,
        });
    }

    rows
}

fn index_flags() -> Status {
    Status::INDEX_NEW
        | Status::INDEX_MODIFIED
        | Status::INDEX_DELETED
        | Status::INDEX_RENAMED
        | Status::INDEX_TYPECHANGE
}

fn staged_code(status: Status) -> Option<StatusCode> {
    if status.contains(Status::INDEX_NEW) {
        Some(StatusCode::Added)
    } else if status.contains(Status::INDEX_DELETED) {
        Some(StatusCode::Deleted)
    } else if status.contains(Status::INDEX_RENAMED) {
        Some(StatusCode::Renamed)
    } else if status.intersects(Status::INDEX_MODIFIED | Status::INDEX_TYPECHANGE) {
        Some(StatusCode::Modified)
    } else {
        None
    }
}

fn unstaged_code(status: Status) -> Option<StatusCode> {
    if status.contains(Status::WT_NEW) {
        // Tracked in the index but recreated after a staged delete
        Some(StatusCode::Added)
    } else if status.contains(Status::WT_DELETED) {
        Some(StatusCode::Deleted)
    } else if status.contains(Status::WT_RENAMED) {
        Some(StatusCode::Renamed)
    } else if status.intersects(Status::WT_MODIFIED | Status::WT_TYPECHANGE | Status::CONFLICTED) {
        Some(StatusCode::Modified)
    } else {
        None
    }
}

fn entry_path(entry: &StatusEntry<'_>) -> String {
    String::from_utf8_lossy(entry.path_bytes()).replace('\\', "/")
}

fn normalize(path: &std::path::Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
