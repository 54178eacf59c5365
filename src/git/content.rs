//! Content resolution at the three revisions a panel cares about.
//!
//! - `WorkingTree`: bytes on disk under the repository root
//! - `Index`: the staged blob (stage 0)
//! - `Head`: the blob in HEAD's tree
//!
//! Content is returned raw; callers decide how to interpret it.

use git2::{ObjectType, Tree};
use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::error::{is_unborn, AppError, GitContext, Result};
use crate::git::repository::GitRepository;
use crate::models::Revision;

/// How many leading bytes content sniffing looks at.
pub const SNIFF_LEN: usize = 512;

impl GitRepository {
    pub fn resolve_content(&self, path: &str, revision: Revision) -> Result<Vec<u8>> {
        match revision {
            Revision::WorkingTree => self.working_tree_content(path),
            Revision::Index => self.index_content(path),
            Revision::Head => self.head_content(path),
        }
    }

    /// Like `resolve_content`, but a missing path (or missing HEAD) is `None`.
    pub fn resolve_optional(&self, path: &str, revision: Revision) -> Result<Option<Vec<u8>>> {
        match self.resolve_content(path, revision) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.is_missing() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// First `SNIFF_LEN` bytes of the on-disk file, `None` if it is gone.
    pub fn working_tree_prefix(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let full_path = self.root.join(path);
        let file = match std::fs::File::open(&full_path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AppError::io("open file", &full_path, err)),
        };

        let mut buffer = Vec::with_capacity(SNIFF_LEN);
        file.take(SNIFF_LEN as u64)
            .read_to_end(&mut buffer)
            .context("read file", &full_path)?;
        Ok(Some(buffer))
    }

    /// HEAD's tree; `ReferenceNotFound` when there are no commits yet.
    pub fn head_tree(&self) -> Result<Tree<'_>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(err) if is_unborn(&err) => {
                return Err(AppError::ReferenceNotFound("HEAD".to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        let commit = head.peel_to_commit()?;
        Ok(commit.tree()?)
    }

    /// File mode of `path` in HEAD's tree (e.g. `0o100755`).
    pub fn head_filemode(&self, path: &str) -> Result<i32> {
        let tree = self.head_tree()?;
        let entry = tree
            .get_path(Path::new(path))
            .map_err(|_| AppError::not_found(path, Revision::Head))?;
        Ok(entry.filemode())
    }

    /// File mode of the stage-0 index entry for `path`.
    pub fn index_filemode(&self, path: &str) -> Result<i32> {
        let index = self.repo.index().context("read index for", path)?;
        let entry = index
            .get_path(Path::new(path), 0)
            .ok_or_else(|| AppError::not_found(path, Revision::Index))?;
        Ok(entry.mode as i32)
    }

    fn working_tree_content(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.root.join(path);
        match std::fs::read(&full_path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(AppError::not_found(path, Revision::WorkingTree))
            }
            Err(err) => Err(AppError::io("read file", &full_path, err)),
        }
    }

    fn index_content(&self, path: &str) -> Result<Vec<u8>> {
        let index = self.repo.index().context("read index for", path)?;
        let entry = index
            .get_path(Path::new(path), 0)
            .ok_or_else(|| AppError::not_found(path, Revision::Index))?;

        let blob = self.repo.find_blob(entry.id).context("read staged blob", path)?;
        Ok(blob.content().to_vec())
    }

    fn head_content(&self, path: &str) -> Result<Vec<u8>> {
        let tree = self.head_tree()?;
        let entry = tree
            .get_path(Path::new(path))
            .map_err(|_| AppError::not_found(path, Revision::Head))?;

        if entry.kind() != Some(ObjectType::Blob) {
            return Err(AppError::not_found(path, Revision::Head));
        }

        let object = entry.to_object(&self.repo).context("read HEAD blob", path)?;
        let blob = object
            .as_blob()
            .ok_or_else(|| AppError::not_found(path, Revision::Head))?;
        Ok(blob.content().to_vec())
    }
}
