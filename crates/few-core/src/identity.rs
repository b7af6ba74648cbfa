//! Package identifier resolution
//!
//! Turns a user-supplied token into the remote to clone and the directory
//! name the package lives under. Resolution is pure: no I/O, and the same
//! token always yields the same identity.
//!
//! Accepted forms:
//!
//! | Token                              | Remote                                   | Name    |
//! |------------------------------------|------------------------------------------|---------|
//! | `demo`                             | `https://github.com/peterbaileyct/demo.git` | `demo` |
//! | `user/demo`                        | `https://github.com/user/demo.git`       | `demo`  |
//! | `https://host/path/demo.git`       | verbatim                                 | `demo`  |
//! | `git@host:user/demo.git`           | verbatim                                 | `demo`  |

use serde::{Deserialize, Serialize};

use few_fs::is_safe_segment;

use crate::{Error, Result};

/// Namespace owner used for single-word shorthand tokens.
pub const DEFAULT_OWNER: &str = "peterbaileyct";

/// Host shorthand tokens resolve against.
pub const DEFAULT_HOST: &str = "github.com";

const VCS_SUFFIX: &str = ".git";

/// A resolved package: where it comes from and what it is called locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageIdentity {
    /// Token as supplied (surrounding whitespace removed)
    pub token: String,
    /// Directory name in the cache and in `.few/words/`
    pub name: String,
    /// Remote handed to the version-control client
    pub remote_url: String,
}

/// Resolves tokens against a default owner and host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    owner: String,
    host: String,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_OWNER, DEFAULT_HOST)
    }
}

impl Resolver {
    pub fn new(owner: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            host: host.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Resolve `token` into a [`PackageIdentity`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for an empty token, shorthand with
    /// more than one `/`, or a URL whose package name cannot be derived.
    pub fn resolve(&self, token: &str) -> Result<PackageIdentity> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid(token, "package identifier is empty"));
        }

        if trimmed.contains("://") {
            return resolve_url(trimmed);
        }
        if let Some(path) = scp_path(trimmed) {
            let name = name_from_path(trimmed, path)?;
            return Ok(PackageIdentity {
                token: trimmed.to_string(),
                name,
                remote_url: trimmed.to_string(),
            });
        }

        self.resolve_shorthand(trimmed)
    }

    fn resolve_shorthand(&self, token: &str) -> Result<PackageIdentity> {
        let (owner, project) = match token.split('/').collect::<Vec<_>>().as_slice() {
            [project] => (self.owner.as_str(), *project),
            [owner, project] => (*owner, *project),
            _ => {
                return Err(Error::invalid(
                    token,
                    "shorthand must be 'name' or 'owner/name'; use a full URL for nested paths",
                ));
            }
        };

        for (part, label) in [(owner, "owner"), (project, "name")] {
            if !is_shorthand_part(part) {
                return Err(Error::invalid(
                    token,
                    format!(
                        "{} '{}' is not a usable name",
                        label, part
                    ),
                ));
            }
        }

        Ok(PackageIdentity {
            token: token.to_string(),
            name: project.to_string(),
            remote_url: format!("https://{}/{}/{}{}", self.host, owner, project, VCS_SUFFIX),
        })
    }
}

/// Resolve `token` with the default owner and host.
pub fn resolve(token: &str) -> Result<PackageIdentity> {
    Resolver::default().resolve(token)
}

fn resolve_url(token: &str) -> Result<PackageIdentity> {
    let parsed =
        url::Url::parse(token).map_err(|e| Error::invalid(token, format!("invalid URL: {}", e)))?;

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(Error::invalid(
            token,
            "URLs with a query string or fragment do not name a repository",
        ));
    }

    let name = name_from_path(token, parsed.path())?;
    Ok(PackageIdentity {
        token: token.to_string(),
        name,
        remote_url: token.to_string(),
    })
}

/// Path part of an scp-style remote (`user@host:path`), if `token` is one.
fn scp_path(token: &str) -> Option<&str> {
    let (head, path) = token.split_once(':')?;
    if head.contains('@') && !head.contains('/') && !path.is_empty() {
        Some(path)
    } else {
        None
    }
}

/// Last non-empty path segment with a trailing `.git` removed.
fn name_from_path(token: &str, path: &str) -> Result<String> {
    let segment = path
        .rsplit('/')
        .find(|s| !s.is_empty())
        .ok_or_else(|| Error::invalid(token, "URL has no path to derive a package name from"))?;
    let name = segment.strip_suffix(VCS_SUFFIX).unwrap_or(segment);

    if !is_safe_segment(name) {
        return Err(Error::invalid(
            token,
            format!("cannot derive a usable package name from '{}'", segment),
        ));
    }
    Ok(name.to_string())
}

/// Any filesystem-safe name without whitespace, which a URL path cannot carry.
fn is_shorthand_part(part: &str) -> bool {
    is_safe_segment(part) && !part.chars().any(char::is_whitespace)
}
