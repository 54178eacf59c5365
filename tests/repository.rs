mod common;

use common::{test_repo, TestRepo, T0};
use git_panel::{AppError, GitRepository, GitService};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

#[test]
fn open_plain_directory_is_not_a_repository() {
    let temp = TempDir::new().expect("tempdir");
    let result = GitRepository::open(temp.path());
    assert!(matches!(result, Err(AppError::NotARepository(_))));
}

#[test]
fn open_missing_directory_is_an_io_failure() {
    let temp = TempDir::new().expect("tempdir");
    let result = GitRepository::open(temp.path().join("does-not-exist"));
    assert!(matches!(result, Err(AppError::Io { .. })));
}

#[test]
fn probe_distinguishes_absence_from_failure() {
    let temp = TempDir::new().expect("tempdir");
    let service = GitService::default();

    assert!(!service.is_repository(temp.path()).expect("probe plain dir"));
    assert!(service.is_repository(temp.path().join("missing")).is_err());

    service.init_repository(temp.path()).expect("init");
    assert!(service.is_repository(temp.path()).expect("probe repo"));
}

#[test]
fn init_twice_fails_with_already_exists() {
    let temp = TempDir::new().expect("tempdir");
    GitRepository::init(temp.path()).expect("first init");

    let second = GitRepository::init(temp.path());
    assert!(matches!(second, Err(AppError::AlreadyExists(_))));
}

#[test]
fn init_creates_non_bare_repository() {
    let temp = TempDir::new().expect("tempdir");
    let repo = GitRepository::init(temp.path().join("fresh")).expect("init");

    assert!(!repo.repo.is_bare());
    assert!(temp.path().join("fresh").join(".git").is_dir());
}

#[rstest]
fn open_discovers_root_from_subdirectory(test_repo: TestRepo) {
    test_repo.write("src/nested/lib.rs", "pub fn f() {}\n");

    let repo = GitRepository::open(test_repo.file("src/nested")).expect("open from subdir");
    let expected = std::fs::canonicalize(test_repo.path()).expect("canonical root");
    assert_eq!(
        std::fs::canonicalize(&repo.root).expect("canonical workdir"),
        expected
    );
}

#[rstest]
fn current_branch_requires_a_commit(test_repo: TestRepo) {
    let service = GitService::default();

    let result = service.get_current_branch(test_repo.path());
    assert!(matches!(result, Err(AppError::ReferenceNotFound(_))));
    assert!(service.list_branches(test_repo.path()).expect("branches").is_empty());
}

#[rstest]
fn branches_mark_head_and_remotes(test_repo: TestRepo) {
    test_repo.write("README.md", "hello\n");
    let base = test_repo.commit_at("initial", T0);
    let head_name = test_repo.current_branch();

    let commit = test_repo.repo.find_commit(base).expect("commit");
    test_repo.repo.branch("feature", &commit, false).expect("branch");

    let remote_ref = format!("refs/remotes/origin/{head_name}");
    test_repo
        .repo
        .reference(&remote_ref, base, true, "remote branch")
        .expect("remote ref");
    test_repo
        .repo
        .reference_symbolic("refs/remotes/origin/HEAD", &remote_ref, true, "remote head")
        .expect("remote head");

    let service = GitService::default();
    let branches = service.list_branches(test_repo.path()).expect("branches");

    let mut local: Vec<(&str, bool)> = branches
        .iter()
        .filter(|b| !b.is_remote)
        .map(|b| (b.name.as_str(), b.is_head))
        .collect();
    let mut expected_local = vec![("feature", false), (head_name.as_str(), true)];
    expected_local.sort();
    local.sort();
    assert_eq!(local, expected_local);

    let remote: Vec<&str> = branches
        .iter()
        .filter(|b| b.is_remote)
        .map(|b| b.name.as_str())
        .collect();
    assert_eq!(remote, vec![format!("origin/{head_name}").as_str()]);
    assert!(branches.iter().filter(|b| b.is_remote).all(|b| !b.is_head));

    assert_eq!(
        service.get_current_branch(test_repo.path()).expect("current"),
        head_name
    );
}
