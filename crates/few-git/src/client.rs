//! Version-control client trait

use std::path::Path;

use few_fs::FewPath;

use crate::Result;

/// Identification of a working version-control client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    /// Program or library name, e.g. `git` or `libgit2`
    pub program: String,
    /// Version string reported by the client
    pub version: String,
}

/// Operations the cache store needs from a version-control client.
///
/// Implementations block until the underlying operation finishes. They never
/// touch anything outside the paths they are given.
pub trait VcsClient {
    /// Short backend name used in logs
    fn name(&self) -> &'static str;

    /// Verify the client can be used, returning its identification.
    fn check_available(&self) -> Result<ClientInfo>;

    /// Clone `url` into `dest`. `dest` must not exist.
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;

    /// Bring the checkout at `path` up to date with its configured remote.
    fn pull(&self, path: &Path) -> Result<()>;

    /// URL of the checkout's `origin` remote, if one is configured.
    fn remote_url(&self, path: &Path) -> Result<Option<String>>;

    /// Whether `path` looks like a checkout this client can update.
    fn is_repository(&self, path: &Path) -> bool {
        path.join(FewPath::GitDir).exists()
    }
}

impl<T: VcsClient + ?Sized> VcsClient for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn check_available(&self) -> Result<ClientInfo> {
        (**self).check_available()
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        (**self).clone_repo(url, dest)
    }

    fn pull(&self, path: &Path) -> Result<()> {
        (**self).pull(path)
    }

    fn remote_url(&self, path: &Path) -> Result<Option<String>> {
        (**self).remote_url(path)
    }

    fn is_repository(&self, path: &Path) -> bool {
        (**self).is_repository(path)
    }
}

/// Compare two remote URLs, ignoring a trailing `/` or `.git`.
pub fn same_remote(a: &str, b: &str) -> bool {
    fn canonical(url: &str) -> &str {
        let url = url.trim().trim_end_matches('/');
        url.strip_suffix(".git").unwrap_or(url)
    }
    canonical(a) == canonical(b)
}
