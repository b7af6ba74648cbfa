//! Both backends against real `file://` remotes.

use few_git::{Error, GitCli, LibGit, VcsClient, same_remote};
use few_test_utils::git::{commit_files, head_commit, remote_repo};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

fn backend(name: &str) -> Box<dyn VcsClient> {
    match name {
        "cli" => Box::new(GitCli::new()),
        "libgit2" => Box::new(LibGit::new()),
        other => panic!("unknown backend {other}"),
    }
}

#[rstest]
#[case("cli")]
#[case("libgit2")]
fn test_clone_creates_checkout(#[case] name: &str) {
    let temp = TempDir::new().unwrap();
    let url = remote_repo(temp.path(), "demo", &[("README.md", "# demo\n")]);
    let dest = temp.path().join("cache/words/demo");

    let client = backend(name);
    client.clone_repo(&url, &dest).unwrap();

    assert!(client.is_repository(&dest));
    assert_eq!(fs::read_to_string(dest.join("README.md")).unwrap(), "# demo\n");
}

#[rstest]
#[case("cli")]
#[case("libgit2")]
fn test_remote_url_reports_origin(#[case] name: &str) {
    let temp = TempDir::new().unwrap();
    let url = remote_repo(temp.path(), "demo", &[("a.txt", "a")]);
    let dest = temp.path().join("checkout");

    let client = backend(name);
    client.clone_repo(&url, &dest).unwrap();

    let origin = client.remote_url(&dest).unwrap().unwrap();
    assert!(same_remote(&origin, &url), "{origin} vs {url}");
}

#[rstest]
#[case("cli")]
#[case("libgit2")]
fn test_pull_fast_forwards_to_remote(#[case] name: &str) {
    let temp = TempDir::new().unwrap();
    let url = remote_repo(temp.path(), "demo", &[("a.txt", "v1")]);
    let remote_path = temp.path().join("demo");
    let dest = temp.path().join("checkout");

    let client = backend(name);
    client.clone_repo(&url, &dest).unwrap();
    commit_files(&remote_path, &[("a.txt", "v2"), ("b.txt", "new")], "Second");

    client.pull(&dest).unwrap();

    assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "v2");
    assert_eq!(fs::read_to_string(dest.join("b.txt")).unwrap(), "new");
    assert_eq!(head_commit(&dest), head_commit(&remote_path));
}

#[rstest]
#[case("cli")]
#[case("libgit2")]
fn test_pull_when_up_to_date_is_ok(#[case] name: &str) {
    let temp = TempDir::new().unwrap();
    let url = remote_repo(temp.path(), "demo", &[("a.txt", "v1")]);
    let dest = temp.path().join("checkout");

    let client = backend(name);
    client.clone_repo(&url, &dest).unwrap();
    client.pull(&dest).unwrap();
    client.pull(&dest).unwrap();
}

#[rstest]
#[case("cli")]
#[case("libgit2")]
fn test_clone_missing_remote_fails(#[case] name: &str) {
    let temp = TempDir::new().unwrap();
    let url = format!("file://{}/nothing-here", temp.path().display());

    let result = backend(name).clone_repo(&url, &temp.path().join("dest"));

    assert!(
        matches!(result, Err(Error::CloneFailed { .. })),
        "expected CloneFailed, got {result:?}"
    );
}

#[rstest]
#[case("cli")]
#[case("libgit2")]
fn test_pull_fails_when_remote_disappears(#[case] name: &str) {
    let temp = TempDir::new().unwrap();
    let url = remote_repo(temp.path(), "demo", &[("a.txt", "v1")]);
    let dest = temp.path().join("checkout");

    let client = backend(name);
    client.clone_repo(&url, &dest).unwrap();
    fs::remove_dir_all(temp.path().join("demo")).unwrap();

    let result = client.pull(&dest);
    assert!(
        matches!(result, Err(Error::PullFailed { .. })),
        "expected PullFailed, got {result:?}"
    );
    // the stale checkout is untouched
    assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "v1");
}

#[rstest]
#[case("cli")]
#[case("libgit2")]
fn test_pull_outside_repository(#[case] name: &str) {
    let temp = TempDir::new().unwrap();
    let result = backend(name).pull(temp.path());
    assert!(matches!(result, Err(Error::NotARepository { .. })));
}

#[test]
fn test_git_cli_reports_version() {
    let info = GitCli::new().check_available().unwrap();
    assert_eq!(info.program, "git");
    assert!(info.version.chars().next().unwrap().is_ascii_digit());
}

#[test]
fn test_remote_url_without_origin_is_none() {
    let temp = TempDir::new().unwrap();
    few_test_utils::git::init_repo_with_files(temp.path(), &[("a.txt", "a")]);

    assert_eq!(GitCli::new().remote_url(temp.path()).unwrap(), None);
    assert_eq!(LibGit::new().remote_url(temp.path()).unwrap(), None);
}
