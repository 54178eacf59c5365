#![allow(dead_code)]

use git2::{IndexAddOption, Oid, Repository, Signature, Time};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Base author time for fixture commits; each commit adds a minute.
pub const T0: i64 = 1_700_000_000;

pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

#[fixture]
pub fn test_repo() -> TestRepo {
    TestRepo::init()
}

impl TestRepo {
    pub fn init() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let repo = Repository::init(dir.path()).expect("init repo");
        {
            let mut config = repo.config().expect("config");
            config.set_str("user.name", "Test User").expect("user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("user.email");
        }
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, contents: impl AsRef<[u8]>) {
        let path = self.file(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, contents).expect("write file");
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.file(relative)).expect("read file")
    }

    pub fn remove(&self, relative: &str) {
        std::fs::remove_file(self.file(relative)).expect("remove file");
    }

    /// Stage one path exactly as it is on disk.
    pub fn stage(&self, relative: &str) {
        let mut index = self.repo.index().expect("index");
        if self.file(relative).exists() {
            index.add_path(Path::new(relative)).expect("add path");
        } else {
            index.remove_path(Path::new(relative)).expect("remove path");
        }
        index.write().expect("write index");
    }

    pub fn stage_all(&self) {
        let mut index = self.repo.index().expect("index");
        index
            .add_all(["*"], IndexAddOption::DEFAULT, None)
            .expect("add all");
        index.update_all(["*"], None).expect("update all");
        index.write().expect("write index");
    }

    /// Stage everything and commit as the default author at `seconds`.
    pub fn commit_at(&self, message: &str, seconds: i64) -> Oid {
        self.commit_as(message, "Test User", "test@example.com", seconds)
    }

    pub fn commit_as(&self, message: &str, name: &str, email: &str, seconds: i64) -> Oid {
        self.stage_all();
        let parents: Vec<git2::Commit<'_>> = match self.repo.head() {
            Ok(head) => vec![head.peel_to_commit().expect("head commit")],
            Err(_) => Vec::new(),
        };
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();
        self.commit_with_parents(message, name, email, seconds, &parent_refs)
    }

    pub fn commit_with_parents(
        &self,
        message: &str,
        name: &str,
        email: &str,
        seconds: i64,
        parents: &[&git2::Commit<'_>],
    ) -> Oid {
        let mut index = self.repo.index().expect("index");
        let tree_id = index.write_tree().expect("write tree");
        let tree = self.repo.find_tree(tree_id).expect("find tree");
        let signature = Signature::new(name, email, &Time::new(seconds, 0)).expect("signature");

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, parents)
            .expect("commit")
    }

    /// Linear history of `count` commits, oldest first, one minute apart.
    pub fn linear_history(&self, count: usize) -> Vec<Oid> {
        (1..=count)
            .map(|i| {
                self.write("log.txt", format!("entry {i}\n"));
                self.commit_at(&format!("commit {i}"), T0 + (i as i64) * 60)
            })
            .collect()
    }

    /// Committed `a.txt` (ten lines), renamed to `b.txt` with both sides
    /// staged, then `line 11` appended on disk. Returns the committed body.
    pub fn staged_rename_then_edit(&self) -> String {
        let body: String = (1..=10).map(|i| format!("line {i}\n")).collect();
        self.write("a.txt", &body);
        self.commit_at("initial", T0);

        std::fs::rename(self.file("a.txt"), self.file("b.txt")).expect("rename");
        self.stage("a.txt");
        self.stage("b.txt");
        self.write("b.txt", format!("{body}line 11\n"));
        body
    }

    /// Committed `a.txt` as `one two`, deletion staged, then recreated on
    /// disk as `one three`.
    pub fn staged_delete_then_recreate(&self) {
        self.write("a.txt", "one\ntwo\n");
        self.commit_at("initial", T0);

        self.remove("a.txt");
        self.stage("a.txt");
        self.write("a.txt", "one\nthree\n");
    }

    pub fn current_branch(&self) -> String {
        self.repo
            .head()
            .expect("head")
            .shorthand()
            .expect("shorthand")
            .to_string()
    }
}
