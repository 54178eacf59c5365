//! Ignore predicate supplied by the caller.
//!
//! The panel core never owns ignore state; it asks an `IgnorePredicate` for
//! every candidate path. Closures of shape `Fn(&Path, &Path) -> bool` work
//! directly, `NoIgnore` accepts everything, and `GitignoreFilter` is the
//! stand-alone default used by the command-line driver.

use ignore::gitignore::Gitignore;
use ignore::Match;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub trait IgnorePredicate {
    /// `root` is the repository root, `path` the absolute candidate path.
    fn is_ignored(&self, root: &Path, path: &Path) -> bool;

    /// Predicate to use for a batch of queries against `root`, when the
    /// implementation can do better than answering each query from scratch.
    fn prepare(&self, _root: &Path) -> Option<Box<dyn IgnorePredicate + '_>> {
        None
    }
}

impl<F> IgnorePredicate for F
where
    F: Fn(&Path, &Path) -> bool,
{
    fn is_ignored(&self, root: &Path, path: &Path) -> bool {
        self(root, path)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoIgnore;

impl IgnorePredicate for NoIgnore {
    fn is_ignored(&self, _root: &Path, _path: &Path) -> bool {
        false
    }
}

/// Matches `.git` internals and the `.gitignore` files between the candidate
/// and the root. The nearest file with a matching rule decides, so a `!rule`
/// there overrides an ignore further up.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitignoreFilter;

impl IgnorePredicate for GitignoreFilter {
    fn is_ignored(&self, root: &Path, path: &Path) -> bool {
        GitignoreMatchers::default().is_ignored(root, path)
    }

    fn prepare(&self, _root: &Path) -> Option<Box<dyn IgnorePredicate + '_>> {
        Some(Box::new(GitignoreMatchers::default()))
    }
}

/// `.gitignore` matchers parsed on first use and reused for every later
/// query in the same batch. `None` marks a directory without one.
#[derive(Default)]
struct GitignoreMatchers {
    by_dir: RefCell<HashMap<PathBuf, Option<Gitignore>>>,
}

impl GitignoreMatchers {
    fn load(dir: &Path) -> Option<Gitignore> {
        let ignore_file = dir.join(".gitignore");
        if !ignore_file.is_file() {
            return None;
        }

        let (matcher, err) = Gitignore::new(&ignore_file);
        if let Some(err) = err {
            tracing::warn!("Partially parsed {}: {}", ignore_file.display(), err);
        }
        Some(matcher)
    }
}

impl IgnorePredicate for GitignoreMatchers {
    fn is_ignored(&self, root: &Path, path: &Path) -> bool {
        if path.components().any(|c| c.as_os_str() == ".git") {
            return true;
        }

        let is_dir = path.is_dir();
        let mut by_dir = self.by_dir.borrow_mut();
        let mut dir = path.parent();

        while let Some(current) = dir {
            if !current.starts_with(root) {
                break;
            }

            let matcher = by_dir
                .entry(current.to_path_buf())
                .or_insert_with(|| Self::load(current));

            if let Some(matcher) = matcher {
                match matcher.matched_path_or_any_parents(path, is_dir) {
                    Match::Ignore(_) => return true,
                    Match::Whitelist(_) => return false,
                    Match::None => {}
                }
            }

            dir = current.parent();
        }

        false
    }
}
