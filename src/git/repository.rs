use git2::{BranchType, ErrorClass, ErrorCode, Repository};
use std::path::{Path, PathBuf};

use crate::error::{is_unborn, AppError, GitContext, Result};
use crate::models::{BranchInfo, CommitInfo};

/// Handle to a non-bare repository, opened fresh for each top-level
/// operation and dropped when it completes.
pub struct GitRepository {
    pub repo: Repository,
    /// Working-tree root
    pub root: PathBuf,
}

impl GitRepository {
    /// Open the repository containing `path`, searching upward.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let original = path.as_ref();
        let canonical = std::fs::canonicalize(original).context("resolve path", original)?;

        let repo = match Repository::discover(&canonical) {
            Ok(repo) => repo,
            Err(err) if err.class() == ErrorClass::Repository && err.code() == ErrorCode::NotFound => {
                return Err(AppError::NotARepository(canonical.display().to_string()));
            }
            Err(err) => return Err(err).context("open repository", &canonical),
        };

        let root = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| AppError::BareRepository(canonical.display().to_string()))?;

        tracing::debug!("Opened repository at {}", root.display());
        Ok(Self { repo, root })
    }

    /// Create a non-bare repository at `path`.
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() && Self::probe(path)? {
            return Err(AppError::AlreadyExists(path.display().to_string()));
        }

        let repo = Repository::init(path).context("initialize repository", path)?;
        let root = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| AppError::BareRepository(path.display().to_string()))?;

        tracing::info!("Initialized repository at {}", root.display());
        Ok(Self { repo, root })
    }

    /// Is `path` inside a repository? Absence is `Ok(false)`; anything else
    /// that goes wrong is an error.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<bool> {
        match Self::open(path) {
            Ok(_) => Ok(true),
            Err(AppError::NotARepository(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Short name of the branch HEAD points at, `"HEAD"` when detached.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head().map_err(|err| {
            if is_unborn(&err) {
                AppError::ReferenceNotFound("HEAD".to_string())
            } else {
                AppError::from(err)
            }
        })?;

        Ok(head.shorthand().unwrap_or("HEAD").to_string())
    }

    pub fn list_branches(&self) -> Result<Vec<BranchInfo>> {
        let current = match self.current_branch() {
            Ok(name) => Some(name),
            Err(AppError::ReferenceNotFound(_)) => None,
            Err(err) => return Err(err),
        };

        let mut branches = Vec::new();

        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            let Some(name) = branch.name()? else { continue };

            branches.push(BranchInfo {
                name: name.to_string(),
                is_remote: false,
                is_head: current.as_deref() == Some(name),
            });
        }

        for branch in self.repo.branches(Some(BranchType::Remote))? {
            let (branch, _) = branch?;
            // origin/HEAD is a symbolic pointer, not a branch
            if branch.get().symbolic_target().is_some() {
                continue;
            }
            let Some(name) = branch.name()? else { continue };

            branches.push(BranchInfo {
                name: name.to_string(),
                is_remote: true,
                is_head: false,
            });
        }

        Ok(branches)
    }

    /// Path relative to the working-tree root, `/`-separated.
    pub fn relative_path(&self, path: &str) -> String {
        let candidate = Path::new(path);
        let relative = candidate.strip_prefix(&self.root).unwrap_or(candidate);
        relative.to_string_lossy().replace('\\', "/")
    }
}

pub fn commit_to_info(commit: &git2::Commit) -> CommitInfo {
    let author = commit.author();
    let timestamp = author.when().seconds();
    CommitInfo {
        hash: commit.id().to_string(),
        message: String::from_utf8_lossy(commit.message_bytes()).trim().to_string(),
        author_name: String::from_utf8_lossy(author.name_bytes()).to_string(),
        author_email: String::from_utf8_lossy(author.email_bytes()).to_string(),
        timestamp,
        relative_time: format_relative_time(timestamp),
        parent_hashes: commit.parent_ids().map(|id| id.to_string()).collect(),
        has_more: false,
    }
}

pub fn format_relative_time(timestamp: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let diff = now - timestamp;

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff < 86400 {
        let hours = diff / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff < 2592000 {
        let days = diff / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else if diff < 31536000 {
        let months = diff / 2592000;
        format!("{} month{} ago", months, if months == 1 { "" } else { "s" })
    } else {
        let years = diff / 31536000;
        format!("{} year{} ago", years, if years == 1 { "" } else { "s" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_time_buckets() {
        let now = chrono::Utc::now().timestamp();
        assert_eq!(format_relative_time(now), "just now");
        assert_eq!(format_relative_time(now - 120), "2 minutes ago");
        assert_eq!(format_relative_time(now - 3600), "1 hour ago");
        assert_eq!(format_relative_time(now - 86400 * 3), "3 days ago");
    }
}
