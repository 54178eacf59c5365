//! Filtered, paginated commit history.
//!
//! A walk runs in fixed stages:
//! 1. resolve the start point (branch, then start hash, then HEAD)
//! 2. iterate newest-first by committer time
//! 3. discard everything up to and including the `offset_hash` cursor
//! 4. filter by date range, author, then message
//! 5. skip `offset` survivors (only without a cursor)
//! 6. collect `limit` commits, peeking one further to set `has_more`
//!
//! The revwalk is owned by `CommitWalk::run` and dropped on every exit.

use chrono::{DateTime, Utc};
use git2::{BranchType, Commit, Oid, Sort};
use std::time::Instant;

use crate::error::{is_unborn, AppError, Result};
use crate::git::repository::{commit_to_info, GitRepository};
use crate::models::{CommitFilter, CommitInfo};

pub struct CommitWalk<'a> {
    repo: &'a GitRepository,
    filter: &'a CommitFilter,
    is_alive: Option<&'a dyn Fn() -> bool>,
}

impl<'a> CommitWalk<'a> {
    pub fn new(repo: &'a GitRepository, filter: &'a CommitFilter) -> Self {
        Self {
            repo,
            filter,
            is_alive: None,
        }
    }

    /// Poll `is_alive` once per commit; the walk fails with `Cancelled`
    /// as soon as it returns false.
    pub fn with_liveness(mut self, is_alive: &'a dyn Fn() -> bool) -> Self {
        self.is_alive = Some(is_alive);
        self
    }

    pub fn run(&self) -> Result<Vec<CommitInfo>> {
        let started = Instant::now();
        let repo = &self.repo.repo;
        let filter = self.filter;
        let start = self.start_point()?;

        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push(start)?;

        let cursor = filter.offset_hash.as_deref().filter(|h| !h.is_empty());
        let mut cursor_open = cursor.is_none();
        let mut skipped = 0usize;
        let mut visited = 0usize;
        let mut has_more = false;
        let mut commits: Vec<CommitInfo> = Vec::new();

        for oid in revwalk {
            if let Some(is_alive) = self.is_alive {
                if !is_alive() {
                    tracing::debug!("History walk cancelled after {} commits", visited);
                    return Err(AppError::Cancelled);
                }
            }

            let oid = oid?;
            visited += 1;

            if !cursor_open {
                if cursor == Some(oid.to_string().as_str()) {
                    cursor_open = true;
                }
                continue;
            }

            let commit = repo.find_commit(oid)?;
            if !matches_filter(&commit, filter) {
                continue;
            }

            if cursor.is_none() && skipped < filter.offset {
                skipped += 1;
                continue;
            }

            if filter.limit > 0 && commits.len() == filter.limit {
                has_more = true;
                break;
            }

            commits.push(commit_to_info(&commit));
        }

        mark_has_more(&mut commits, has_more);

        tracing::debug!(
            "History walk: {} commits returned, {} visited, has_more={} in {:?}",
            commits.len(),
            visited,
            has_more,
            started.elapsed()
        );

        Ok(commits)
    }

    fn start_point(&self) -> Result<Oid> {
        let repo = &self.repo.repo;

        if let Some(branch) = self.filter.branch.as_deref().filter(|b| !b.is_empty()) {
            let branch_ref = repo
                .find_branch(branch, BranchType::Local)
                .map_err(|_| AppError::ReferenceNotFound(branch.to_string()))?;
            let commit = branch_ref.get().peel_to_commit()?;
            return Ok(commit.id());
        }

        if let Some(hash) = self.filter.start_hash.as_deref().filter(|h| !h.is_empty()) {
            let commit = Oid::from_str(hash)
                .and_then(|oid| repo.find_commit(oid))
                .map_err(|_| AppError::ReferenceNotFound(hash.to_string()))?;
            return Ok(commit.id());
        }

        let head = match repo.head() {
            Ok(head) => head,
            Err(err) if is_unborn(&err) => {
                return Err(AppError::ReferenceNotFound("HEAD".to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        Ok(head.peel_to_commit()?.id())
    }
}

/// Every row but the last says "more follows"; the last carries the
/// look-ahead result.
fn mark_has_more(commits: &mut [CommitInfo], has_more: bool) {
    let last = commits.len().saturating_sub(1);
    for (i, commit) in commits.iter_mut().enumerate() {
        commit.has_more = i < last || has_more;
    }
}

fn matches_filter(commit: &Commit<'_>, filter: &CommitFilter) -> bool {
    let author = commit.author();
    let when = author.when().seconds();
    let name = String::from_utf8_lossy(author.name_bytes());
    let email = String::from_utf8_lossy(author.email_bytes());
    let message = String::from_utf8_lossy(commit.message_bytes());

    in_date_range(when, filter.start_date, filter.end_date)
        && author_matches(&name, &email, filter.author.as_deref())
        && message_matches(&message, filter.search_query.as_deref())
}

fn in_date_range(when: i64, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
    if let Some(start) = start {
        if when < start.timestamp() {
            return false;
        }
    }
    if let Some(end) = end {
        if when > end.timestamp() {
            return false;
        }
    }
    true
}

fn author_matches(name: &str, email: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) if !needle.is_empty() => name.contains(needle) || email.contains(needle),
        _ => true,
    }
}

fn message_matches(message: &str, query: Option<&str>) -> bool {
    match query {
        Some(query) if !query.is_empty() => message.to_lowercase().contains(&query.to_lowercase()),
        _ => true,
    }
}

impl GitRepository {
    pub fn list_commits(&self, filter: &CommitFilter) -> Result<Vec<CommitInfo>> {
        CommitWalk::new(self, filter).run()
    }

    pub fn list_commits_after(&self, offset_hash: &str, limit: usize) -> Result<Vec<CommitInfo>> {
        self.list_commits(&CommitFilter::after(offset_hash, limit))
    }

    pub fn list_commits_by_branch(&self, branch: &str, limit: usize) -> Result<Vec<CommitInfo>> {
        self.list_commits(&CommitFilter::on_branch(branch, limit))
    }

    pub fn list_commits_by_author(&self, author: &str, limit: usize) -> Result<Vec<CommitInfo>> {
        self.list_commits(&CommitFilter::by_author(author, limit))
    }

    pub fn search_commits(&self, query: &str, limit: usize) -> Result<Vec<CommitInfo>> {
        self.list_commits(&CommitFilter::search(query, limit))
    }

    pub fn get_head_commit(&self) -> Result<CommitInfo> {
        let mut page = self.list_commits(&CommitFilter::with_limit(1))?;
        let mut head = page
            .pop()
            .ok_or_else(|| AppError::ReferenceNotFound("HEAD".to_string()))?;
        head.has_more = false;
        Ok(head)
    }
}
