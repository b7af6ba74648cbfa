//! Backend that uses libgit2 through the `git2` crate
//!
//! Needs no external executable, but only sees credentials libgit2 itself
//! can reach. Updates are fetch + fast-forward only.

use std::path::Path;

use git2::Repository;
use git2::build::{CheckoutBuilder, RepoBuilder};

use crate::client::{ClientInfo, VcsClient};
use crate::{Error, Result};

const DEFAULT_REMOTE: &str = "origin";

/// Version-control client backed by libgit2.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibGit;

impl LibGit {
    pub fn new() -> Self {
        Self
    }
}

impl VcsClient for LibGit {
    fn name(&self) -> &'static str {
        "libgit2"
    }

    fn check_available(&self) -> Result<ClientInfo> {
        let version = git2::Version::get();
        let (major, minor, patch) = version.libgit2_version();
        Ok(ClientInfo {
            program: "libgit2".to_string(),
            version: format!("{}.{}.{}", major, minor, patch),
        })
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Fs(few_fs::Error::io(parent, e)))?;
        }

        RepoBuilder::new()
            .clone(url, dest)
            .map_err(|e| Error::CloneFailed {
                url: url.to_string(),
                message: e.message().to_string(),
            })?;
        Ok(())
    }

    fn pull(&self, path: &Path) -> Result<()> {
        let repo = Repository::open(path).map_err(|_| Error::NotARepository {
            path: path.to_path_buf(),
        })?;
        fast_forward(&repo, path)
    }

    fn remote_url(&self, path: &Path) -> Result<Option<String>> {
        let repo = Repository::open(path).map_err(|_| Error::NotARepository {
            path: path.to_path_buf(),
        })?;
        let url = match repo.find_remote(DEFAULT_REMOTE) {
            Ok(remote) => remote.url().map(str::to_string),
            Err(e) if e.code() == git2::ErrorCode::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(url)
    }

    fn is_repository(&self, path: &Path) -> bool {
        Repository::open(path).is_ok()
    }
}

/// Fetch the current branch from `origin` and fast-forward to it.
fn fast_forward(repo: &Repository, path: &Path) -> Result<()> {
    let pull_failed = |message: String| Error::PullFailed {
        path: path.to_path_buf(),
        message,
    };

    let head = repo.head()?;
    if !head.is_branch() {
        return Err(pull_failed("HEAD is detached".to_string()));
    }
    let branch_name = head.shorthand().unwrap_or("HEAD").to_string();

    let mut remote = repo
        .find_remote(DEFAULT_REMOTE)
        .map_err(|e| pull_failed(format!("No '{}' remote: {}", DEFAULT_REMOTE, e.message())))?;
    remote
        .fetch(&[&branch_name], None, None)
        .map_err(|e| pull_failed(format!("Fetch failed: {}", e.message())))?;

    let fetch_head = repo
        .find_reference("FETCH_HEAD")
        .map_err(|e| pull_failed(format!("Could not find FETCH_HEAD: {}", e.message())))?;
    let fetch_commit = fetch_head
        .peel_to_commit()
        .map_err(|e| pull_failed(format!("Could not resolve FETCH_HEAD: {}", e.message())))?;

    let annotated = repo.find_annotated_commit(fetch_commit.id())?;
    let (analysis, _) = repo.merge_analysis(&[&annotated])?;

    if analysis.is_up_to_date() {
        tracing::debug!(path = %path.display(), "Already up to date");
        return Ok(());
    }

    if analysis.is_fast_forward() {
        let refname = format!("refs/heads/{}", branch_name);
        let mut reference = repo.find_reference(&refname)?;
        reference.set_target(
            fetch_commit.id(),
            &format!("pull: fast-forward to {}", fetch_commit.id()),
        )?;
        repo.checkout_head(Some(CheckoutBuilder::default().force()))?;
        return Ok(());
    }

    let head_commit = repo.head()?.peel_to_commit()?;
    Err(Error::CannotFastForward {
        path: path.to_path_buf(),
        message: format!(
            "{} has diverged: local {} vs remote {}",
            branch_name,
            head_commit.id(),
            fetch_commit.id()
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn libgit_is_always_available() {
        let info = LibGit::new().check_available().unwrap();
        assert_eq!(info.program, "libgit2");
        assert!(!info.version.is_empty());
    }

    #[test]
    fn clone_requires_valid_url() {
        let temp = TempDir::new().unwrap();
        let result = LibGit::new().clone_repo("not-a-valid-url", &temp.path().join("dest"));
        assert!(matches!(result, Err(Error::CloneFailed { .. })));
    }

    #[test]
    fn pull_outside_repository_fails() {
        let temp = TempDir::new().unwrap();
        let result = LibGit::new().pull(temp.path());
        assert!(matches!(result, Err(Error::NotARepository { .. })));
    }
}
