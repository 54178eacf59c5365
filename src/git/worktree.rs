//! Mutating operations: stage, unstage, discard, commit.
//!
//! The core does no locking; callers serialize these per repository.

use git2::Tree;
use std::path::Path;

use crate::error::{is_unborn, AppError, GitContext, Result};
use crate::git::repository::{commit_to_info, GitRepository};
use crate::git::status::is_untracked;
use crate::models::{CommitInfo, Revision};

impl GitRepository {
    /// Stage the working-tree state of `path`, including its deletion.
    pub fn stage_file(&self, path: &str) -> Result<()> {
        let path = self.relative_path(path);
        let mut index = self.repo.index().context("read index for", &path)?;

        if self.root.join(&path).exists() {
            index.add_path(Path::new(&path)).context("stage", &path)?;
        } else {
            index.remove_path(Path::new(&path)).context("stage deletion of", &path)?;
        }
        index.write().context("write index for", &path)?;

        tracing::info!("Staged {}", path);
        Ok(())
    }

    /// Restore the index entry for `path` from HEAD; the working tree is
    /// left alone.
    pub fn unstage_file(&self, path: &str) -> Result<()> {
        let path = self.relative_path(path);

        match self.repo.head() {
            Ok(head) => {
                let commit = head.peel_to_commit()?;
                self.repo
                    .reset_default(Some(commit.as_object()), [path.as_str()])
                    .context("unstage", &path)?;
            }
            Err(err) if is_unborn(&err) => {
                let mut index = self.repo.index().context("read index for", &path)?;
                index.remove_path(Path::new(&path)).context("unstage", &path)?;
                index.write().context("write index for", &path)?;
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!("Unstaged {}", path);
        Ok(())
    }

    /// Throw away working-tree changes: untracked files are deleted, tracked
    /// files are rewritten from HEAD with HEAD's file mode. A path HEAD does
    /// not have (staged addition, rename target) is rewritten from the index.
    pub fn discard_changes(&self, path: &str) -> Result<()> {
        let path = self.relative_path(path);
        let full_path = self.root.join(&path);
        let status = self.path_status(&path)?;

        if is_untracked(status) {
            std::fs::remove_file(&full_path).context("delete untracked file", &full_path)?;
            tracing::info!("Deleted untracked {}", path);
            return Ok(());
        }

        let (content, mode) = match self.resolve_optional(&path, Revision::Head)? {
            Some(content) => (content, self.head_filemode(&path)?),
            None => {
                let content = self
                    .resolve_optional(&path, Revision::Index)?
                    .ok_or_else(|| AppError::not_found(path.as_str(), Revision::Head))?;
                (content, self.index_filemode(&path)?)
            }
        };

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).context("create directory", parent)?;
        }
        std::fs::write(&full_path, content).context("write file", &full_path)?;
        set_mode(&full_path, mode)?;

        tracing::info!("Discarded changes to {}", path);
        Ok(())
    }

    /// Commit the index on top of HEAD (or as the root commit).
    pub fn commit(&self, message: &str) -> Result<CommitInfo> {
        if message.trim().is_empty() {
            return Err(AppError::InvalidArgument("commit message is empty".to_string()));
        }

        let mut index = self.repo.index().context("read index for", &self.root)?;
        let tree_id = index.write_tree().context("write tree for", &self.root)?;
        let tree: Tree<'_> = self.repo.find_tree(tree_id)?;
        let signature = self.repo.signature().context("read commit identity for", &self.root)?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(err) if is_unborn(&err) => None,
            Err(err) => return Err(err.into()),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .context("create commit in", &self.root)?;
        let commit = self.repo.find_commit(oid)?;

        tracing::info!("Created commit {}", oid);
        Ok(commit_to_info(&commit))
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: i32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = if mode & 0o111 != 0 { 0o755 } else { 0o644 };
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(permissions))
        .context("set permissions on", path)
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: i32) -> Result<()> {
    Ok(())
}
