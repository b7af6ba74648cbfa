//! Real git repositories for tests that exercise an actual clone or pull.
//!
//! Repositories are created with the `git` CLI and addressed through
//! `file://` URLs, so no network access is needed.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Run `git` in `path`, panicking with stderr on failure.
pub fn git(path: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .unwrap_or_else(|e| panic!("git: failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "git: `git {args:?}` failed in {}:\n{}",
            path.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Whether a usable `git` executable is on `PATH`.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Initialise a repository with a `main` branch and one commit of `files`.
///
/// Configures a local identity and disables signing so commits work on any
/// machine.
///
/// # Panics
/// Panics if any git operation fails.
pub fn init_repo_with_files(path: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(path)
        .unwrap_or_else(|e| panic!("init_repo_with_files: failed to create {}: {e}", path.display()));

    git(path, &["init", "--quiet"]);
    git(path, &["config", "user.email", "test@test.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "commit.gpgsign", "false"]);
    // independent of the machine's init.defaultBranch
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);

    write_files(path, files);
    git(path, &["add", "--all"]);
    git(path, &["commit", "--quiet", "-m", "Initial commit"]);
}

/// Write `files` into `path` and commit them.
///
/// # Panics
/// Panics if any filesystem or git operation fails.
pub fn commit_files(path: &Path, files: &[(&str, &str)], message: &str) {
    write_files(path, files);
    git(path, &["add", "--all"]);
    git(path, &["commit", "--quiet", "-m", message]);
}

/// Create a publishable remote named `name` under `parent` and return its URL.
///
/// # Panics
/// Panics if any filesystem or git operation fails.
pub fn remote_repo(parent: &Path, name: &str, files: &[(&str, &str)]) -> String {
    let path = parent.join(name);
    init_repo_with_files(&path, files);
    file_url(&path)
}

/// `file://` URL for a local path.
pub fn file_url(path: &Path) -> String {
    let display = path.to_string_lossy().replace('\\', "/");
    if display.starts_with('/') {
        format!("file://{}", display)
    } else {
        format!("file:///{}", display)
    }
}

/// Open an existing repository with `git2`.
///
/// # Panics
/// Panics if `path` is not a repository.
pub fn open(path: &Path) -> git2::Repository {
    git2::Repository::open(path)
        .unwrap_or_else(|e| panic!("open: {} is not a repository: {e}", path.display()))
}

/// Hex id of the commit `HEAD` points at.
///
/// # Panics
/// Panics if the repository has no commits.
pub fn head_commit(path: &Path) -> String {
    let repo = open(path);
    let commit = repo
        .head()
        .and_then(|h| h.peel_to_commit())
        .unwrap_or_else(|e| panic!("head_commit: no HEAD commit in {}: {e}", path.display()));
    commit.id().to_string()
}

fn write_files(path: &Path, files: &[(&str, &str)]) {
    for (relative, content) in files {
        let file = path.join(relative);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("write_files: failed to create {}: {e}", parent.display())
            });
        }
        fs::write(&file, content)
            .unwrap_or_else(|e| panic!("write_files: failed to write {}: {e}", file.display()));
    }
}
