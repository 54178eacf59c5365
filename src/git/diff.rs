//! Line-level unified diffs for a single path.
//!
//! `diff_text` is the pure engine: it aligns two texts line by line (Myers)
//! and renders one full-file hunk. `GitRepository::get_file_diff` picks the
//! two sides from HEAD, index and working tree depending on whether the
//! staged or unstaged change is wanted.

use git2::Status;
use similar::{Algorithm, ChangeTag, TextDiff};

use crate::error::{AppError, Result};
use crate::git::ignore::IgnorePredicate;
use crate::git::repository::GitRepository;
use crate::git::sniff;
use crate::git::status::is_untracked;
use crate::models::{DiffStats, FileDiff, Revision};

impl GitRepository {
    /// Diff for `path`: staged is HEAD vs index, unstaged is index (or HEAD)
    /// vs working tree, untracked is empty vs working tree.
    pub fn get_file_diff(
        &self,
        path: &str,
        staged: bool,
        ignore: &dyn IgnorePredicate,
    ) -> Result<FileDiff> {
        let path = self.relative_path(path);
        let status = self.path_status(&path)?;

        let untracked = is_untracked(status)
            || status.contains(Status::IGNORED)
            || ignore.is_ignored(&self.root, &self.root.join(&path));

        if untracked && staged {
            return Err(AppError::InvalidArgument(format!(
                "cannot get staged diff for untracked file {}",
                path
            )));
        }

        // A staged delete with the file recreated on disk still has content
        let deleted = status.contains(Status::WT_DELETED)
            || (status.contains(Status::INDEX_DELETED) && !status.contains(Status::WT_NEW));
        if !deleted {
            if let Some(prefix) = self.working_tree_prefix(&path)? {
                if sniff::is_binary(&prefix) {
                    tracing::debug!("Skipping binary diff for {}", path);
                    return Ok(FileDiff::binary(path));
                }
            }
        }

        let (old, new) = if staged {
            (
                self.resolve_optional(&path, Revision::Head)?,
                self.resolve_optional(&path, Revision::Index)?,
            )
        } else if untracked {
            (None, self.resolve_optional(&path, Revision::WorkingTree)?)
        } else {
            let base = match self.resolve_optional(&path, Revision::Index)? {
                Some(bytes) => Some(bytes),
                None => self.resolve_optional(&path, Revision::Head)?,
            };
            (base, self.resolve_optional(&path, Revision::WorkingTree)?)
        };

        if old.is_none() && new.is_none() && status.is_empty() {
            return Err(AppError::not_found(path, Revision::WorkingTree));
        }

        let old = decode(old);
        let new = decode(new);
        let (content, stats) = diff_text(&old, &new, &path);

        Ok(FileDiff::text(path, content, stats))
    }
}

fn decode(bytes: Option<Vec<u8>>) -> String {
    bytes
        .map(|b| String::from_utf8_lossy(&b).into_owned())
        .unwrap_or_default()
}

/// Lines of `content` with a single trailing newline removed first, so
/// `"a\n"` is one line and `""` is none.
pub fn split_lines(content: &str) -> Vec<&str> {
    if content.is_empty() {
        return Vec::new();
    }
    content
        .strip_suffix('\n')
        .unwrap_or(content)
        .split('\n')
        .collect()
}

/// Unified diff of `old` → `new` as a single full-file hunk.
pub fn diff_text(old: &str, new: &str, path: &str) -> (String, DiffStats) {
    let mut output = format!("--- a/{}\n+++ b/{}\n", path, path);
    let mut stats = DiffStats::default();

    let old_lines = split_lines(old);

    if new.is_empty() && !old.is_empty() {
        stats.deleted = old_lines.len();
        output.push_str(&format!("@@ -1,{} +0,0 @@\n", old_lines.len()));
        for line in &old_lines {
            push_line(&mut output, '-', line);
        }
        return (output, stats);
    }

    let new_lines = split_lines(new);
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_slices(old_lines.as_slice(), new_lines.as_slice());

    for change in diff.iter_all_changes() {
        let prefix = match change.tag() {
            ChangeTag::Equal => ' ',
            ChangeTag::Insert => {
                stats.added += 1;
                '+'
            }
            ChangeTag::Delete => {
                stats.deleted += 1;
                '-'
            }
        };
        push_line(&mut output, prefix, change.value());
    }

    (output, stats)
}

fn push_line(output: &mut String, prefix: char, line: &str) {
    output.push(prefix);
    output.push_str(line);
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// Rebuild `new` from `old` using only the rendered body lines.
    fn apply(old: &str, rendered: &str) -> Vec<String> {
        let mut old_lines = split_lines(old).into_iter();
        let mut result = Vec::new();

        for line in rendered.lines().skip(2) {
            if line.starts_with("@@") {
                continue;
            }
            let (prefix, body) = line.split_at(1);
            match prefix {
                " " => {
                    assert_eq!(old_lines.next(), Some(body), "context must match old");
                    result.push(body.to_string());
                }
                "-" => {
                    assert_eq!(old_lines.next(), Some(body), "deletion must match old");
                }
                "+" => result.push(body.to_string()),
                other => panic!("unexpected prefix {:?}", other),
            }
        }

        assert_eq!(old_lines.next(), None, "every old line must be consumed");
        result
    }

    #[rstest]
    #[case("", "")]
    #[case("", "one\ntwo\n")]
    #[case("one\ntwo\n", "")]
    #[case("a\nb\nc\n", "a\nb\nc\n")]
    #[case("a\nb\nc\n", "a\nc\nd\n")]
    #[case("line1\nline2\nline3\nline4\n", "line2\nline3_modified\nline4\nline5\n")]
    #[case("no newline", "no newline\nadded")]
    #[case("\n\n\n", "\n")]
    fn round_trip_reconstructs_new(#[case] old: &str, #[case] new: &str) {
        let (rendered, stats) = diff_text(old, new, "file.txt");
        let rebuilt = apply(old, &rendered);
        let expected: Vec<String> = split_lines(new).into_iter().map(String::from).collect();

        assert_eq!(rebuilt, expected);
        assert_eq!(
            stats.added,
            rendered.lines().skip(2).filter(|l| l.starts_with('+')).count()
        );
        assert_eq!(stats.modified, 0);
    }

    #[test]
    fn deletion_emits_every_old_line() {
        let (rendered, stats) = diff_text("one\ntwo\nthree\n", "", "gone.txt");

        assert_eq!(
            rendered,
            "--- a/gone.txt\n+++ b/gone.txt\n@@ -1,3 +0,0 @@\n-one\n-two\n-three\n"
        );
        assert_eq!(
            stats,
            DiffStats {
                added: 0,
                deleted: 3,
                modified: 0
            }
        );
    }

    #[test]
    fn creation_marks_every_line_added() {
        let (rendered, stats) = diff_text("", "alpha\nbeta\n", "new.txt");

        assert_eq!(rendered, "--- a/new.txt\n+++ b/new.txt\n+alpha\n+beta\n");
        assert_eq!(stats.added, 2);
        assert_eq!(stats.deleted, 0);
    }

    #[test]
    fn modification_keeps_context_lines() {
        let (rendered, stats) = diff_text("a\nb\nc\n", "a\nB\nc\n", "m.txt");

        assert_eq!(rendered, "--- a/m.txt\n+++ b/m.txt\n a\n-b\n+B\n c\n");
        assert_eq!((stats.added, stats.deleted), (1, 1));
    }

    #[test]
    fn split_lines_strips_one_trailing_newline() {
        assert_eq!(split_lines(""), Vec::<&str>::new());
        assert_eq!(split_lines("a"), vec!["a"]);
        assert_eq!(split_lines("a\n"), vec!["a"]);
        assert_eq!(split_lines("a\n\n"), vec!["a", ""]);
    }
}
