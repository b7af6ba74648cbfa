//! The user-level cache of package checkouts
//!
//! Each package gets exactly one working copy at `<cache_root>/words/<name>`.
//! The first request clones it; later requests pull. A pull that fails leaves
//! the existing copy in place and is reported as stale rather than fatal.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use few_fs::{NormalizedPath, io};
use few_git::{VcsClient, same_remote};

use crate::identity::PackageIdentity;
use crate::{Error, Result};

/// How a cache entry was brought up to date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CacheStatus {
    /// Freshly cloned
    Cloned,
    /// Existing checkout pulled successfully
    Updated,
    /// Pull failed; the existing checkout is used as-is
    Stale { reason: String },
}

impl CacheStatus {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale { .. })
    }
}

/// A package checkout in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub name: String,
    pub path: NormalizedPath,
    pub status: CacheStatus,
}

/// Cache rooted at `<cache_root>/words`.
pub struct CacheStore<'a> {
    root: NormalizedPath,
    vcs: &'a dyn VcsClient,
}

impl<'a> CacheStore<'a> {
    /// `root` is the `words` directory, see [`Settings::words_root`](crate::Settings::words_root).
    pub fn new(root: NormalizedPath, vcs: &'a dyn VcsClient) -> Self {
        Self { root, vcs }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn entry_path(&self, name: &str) -> NormalizedPath {
        self.root.join(name)
    }

    /// Make sure the entry for `identity` exists and is as current as the
    /// remote allows.
    ///
    /// # Errors
    ///
    /// - [`Error::FetchError`] when there is no entry and the clone fails; no
    ///   entry is left behind.
    /// - [`Error::NameCollision`] when the entry was cloned from a different
    ///   remote; the entry is left untouched.
    pub fn ensure_fresh(&self, identity: &PackageIdentity) -> Result<CacheEntry> {
        io::ensure_dir(&self.root)?;
        let path = self.entry_path(&identity.name);
        let native = path.to_native();

        let status = if self.vcs.is_repository(&native) {
            self.check_origin(identity, &native)?;
            self.update(identity, &native)
        } else {
            if native.exists() {
                warn!(
                    package = %identity.name,
                    path = %path.as_str(),
                    "Cache entry is not a repository; cloning afresh"
                );
                io::remove_dir_if_exists(&path)?;
            }
            self.clone_into(identity, &native)?;
            CacheStatus::Cloned
        };

        Ok(CacheEntry {
            name: identity.name.clone(),
            path,
            status,
        })
    }

    fn check_origin(&self, identity: &PackageIdentity, path: &Path) -> Result<()> {
        match self.vcs.remote_url(path) {
            Ok(Some(existing)) if !same_remote(&existing, &identity.remote_url) => {
                Err(Error::NameCollision {
                    name: identity.name.clone(),
                    existing,
                    requested: identity.remote_url.clone(),
                })
            }
            Ok(_) => Ok(()),
            // Unreadable origin: let the pull decide whether the entry is usable
            Err(e) => {
                debug!(package = %identity.name, error = %e, "Could not read origin");
                Ok(())
            }
        }
    }

    fn update(&self, identity: &PackageIdentity, path: &Path) -> CacheStatus {
        debug!(package = %identity.name, backend = self.vcs.name(), "Pulling cache entry");
        match self.vcs.pull(path) {
            Ok(()) => {
                info!(package = %identity.name, "Updated cache entry");
                CacheStatus::Updated
            }
            Err(source) => {
                let error = Error::SyncError {
                    name: identity.name.clone(),
                    source,
                };
                warn!("{}", error);
                CacheStatus::Stale {
                    reason: error.to_string(),
                }
            }
        }
    }

    /// Clone into a staging directory and rename into place on success.
    fn clone_into(&self, identity: &PackageIdentity, dest: &Path) -> Result<()> {
        let staging = staging_path(dest);
        discard(&staging);

        info!(package = %identity.name, url = %identity.remote_url, "Cloning into cache");
        let fetch_error = |source: few_git::Error| Error::FetchError {
            name: identity.name.clone(),
            url: identity.remote_url.clone(),
            source,
        };

        if let Err(source) = self.vcs.clone_repo(&identity.remote_url, &staging) {
            discard(&staging);
            return Err(fetch_error(source));
        }
        if let Err(e) = fs::rename(&staging, dest) {
            discard(&staging);
            return Err(fetch_error(few_git::Error::Fs(few_fs::Error::io(dest, e))));
        }
        Ok(())
    }
}

fn staging_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{}.clone-{}", name, std::process::id()))
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_dir_all(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!(path = %path.display(), error = %e, "Could not remove staging directory");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_is_hidden_sibling() {
        let staging = staging_path(Path::new("/cache/words/demo"));
        assert_eq!(staging.parent(), Some(Path::new("/cache/words")));
        assert!(
            staging
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with(".demo.clone-")
        );
    }
}
