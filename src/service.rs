//! Per-call facade over `GitRepository`.
//!
//! Every operation takes the project path, opens a fresh handle, does its
//! work and drops the handle before returning. Nothing is cached between
//! calls, so calls against different repositories never interact.

use std::path::Path;

use crate::error::Result;
use crate::git::{CommitWalk, GitRepository, IgnorePredicate, NoIgnore};
use crate::models::{BranchInfo, CommitFilter, CommitInfo, FileDiff, FileStatus};

pub struct GitService {
    ignore: Box<dyn IgnorePredicate + Send + Sync>,
}

impl Default for GitService {
    fn default() -> Self {
        Self::new(NoIgnore)
    }
}

impl GitService {
    pub fn new(ignore: impl IgnorePredicate + Send + Sync + 'static) -> Self {
        Self {
            ignore: Box::new(ignore),
        }
    }

    pub fn is_repository(&self, project_path: impl AsRef<Path>) -> Result<bool> {
        GitRepository::probe(project_path)
    }

    pub fn init_repository(&self, project_path: impl AsRef<Path>) -> Result<()> {
        GitRepository::init(project_path).map(|_| ())
    }

    pub fn get_status(&self, project_path: impl AsRef<Path>) -> Result<Vec<FileStatus>> {
        GitRepository::open(project_path)?.get_status(&*self.ignore)
    }

    pub fn stage_file(&self, project_path: impl AsRef<Path>, file: &str) -> Result<()> {
        GitRepository::open(project_path)?.stage_file(file)
    }

    pub fn unstage_file(&self, project_path: impl AsRef<Path>, file: &str) -> Result<()> {
        GitRepository::open(project_path)?.unstage_file(file)
    }

    pub fn discard_changes(&self, project_path: impl AsRef<Path>, file: &str) -> Result<()> {
        GitRepository::open(project_path)?.discard_changes(file)
    }

    pub fn commit(&self, project_path: impl AsRef<Path>, message: &str) -> Result<CommitInfo> {
        GitRepository::open(project_path)?.commit(message)
    }

    pub fn list_branches(&self, project_path: impl AsRef<Path>) -> Result<Vec<BranchInfo>> {
        GitRepository::open(project_path)?.list_branches()
    }

    pub fn get_current_branch(&self, project_path: impl AsRef<Path>) -> Result<String> {
        GitRepository::open(project_path)?.current_branch()
    }

    pub fn list_commits(
        &self,
        project_path: impl AsRef<Path>,
        filter: &CommitFilter,
    ) -> Result<Vec<CommitInfo>> {
        GitRepository::open(project_path)?.list_commits(filter)
    }

    /// `list_commits` that stops with `Cancelled` once `is_alive` turns false.
    pub fn list_commits_with_liveness(
        &self,
        project_path: impl AsRef<Path>,
        filter: &CommitFilter,
        is_alive: &dyn Fn() -> bool,
    ) -> Result<Vec<CommitInfo>> {
        let repo = GitRepository::open(project_path)?;
        CommitWalk::new(&repo, filter).with_liveness(is_alive).run()
    }

    pub fn list_commits_after(
        &self,
        project_path: impl AsRef<Path>,
        offset_hash: &str,
        limit: usize,
    ) -> Result<Vec<CommitInfo>> {
        GitRepository::open(project_path)?.list_commits_after(offset_hash, limit)
    }

    pub fn list_commits_by_branch(
        &self,
        project_path: impl AsRef<Path>,
        branch: &str,
        limit: usize,
    ) -> Result<Vec<CommitInfo>> {
        GitRepository::open(project_path)?.list_commits_by_branch(branch, limit)
    }

    pub fn list_commits_by_author(
        &self,
        project_path: impl AsRef<Path>,
        author: &str,
        limit: usize,
    ) -> Result<Vec<CommitInfo>> {
        GitRepository::open(project_path)?.list_commits_by_author(author, limit)
    }

    pub fn search_commits(
        &self,
        project_path: impl AsRef<Path>,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CommitInfo>> {
        GitRepository::open(project_path)?.search_commits(query, limit)
    }

    pub fn get_head_commit(&self, project_path: impl AsRef<Path>) -> Result<CommitInfo> {
        GitRepository::open(project_path)?.get_head_commit()
    }

    pub fn get_file_diff(
        &self,
        project_path: impl AsRef<Path>,
        file: &str,
        staged: bool,
    ) -> Result<FileDiff> {
        GitRepository::open(project_path)?.get_file_diff(file, staged, &*self.ignore)
    }
}
