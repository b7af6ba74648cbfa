//! [`Settings`] and the optional user configuration file

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use few_fs::{ConfigStore, FewPath, NormalizedPath};
use few_git::{GitCli, LibGit, VcsClient};

use crate::identity::{DEFAULT_HOST, DEFAULT_OWNER, Resolver};
use crate::{Error, Result};

/// Which version-control implementation the cache store drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsBackend {
    /// The system `git` executable
    #[default]
    Cli,
    /// libgit2, in-process
    Libgit2,
}

impl VcsBackend {
    /// Build a client for this backend.
    ///
    /// `git_program` overrides the executable used by [`VcsBackend::Cli`] and
    /// is ignored by libgit2.
    pub fn build(self, git_program: Option<PathBuf>) -> Box<dyn VcsClient> {
        match self {
            Self::Cli => match git_program {
                Some(program) => Box::new(GitCli::with_program(program)),
                None => Box::new(GitCli::new()),
            },
            Self::Libgit2 => Box::new(LibGit::new()),
        }
    }
}

impl fmt::Display for VcsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "cli"),
            Self::Libgit2 => write!(f, "libgit2"),
        }
    }
}

impl FromStr for VcsBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cli" | "git" => Ok(Self::Cli),
            "libgit2" | "git2" => Ok(Self::Libgit2),
            other => Err(format!(
                "unknown backend '{}', expected 'cli' or 'libgit2'",
                other
            )),
        }
    }
}

/// Contents of `<cache_root>/config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Owner for single-word shorthand tokens
    pub default_owner: Option<String>,
    /// Host shorthand tokens resolve against
    pub host: Option<String>,
    /// Preferred version-control backend
    pub backend: Option<VcsBackend>,
}

/// Explicit configuration passed into every engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// User-level cache root, `~/.few` by default
    pub cache_root: NormalizedPath,
    pub default_owner: String,
    pub host: String,
    pub backend: VcsBackend,
}

impl Settings {
    /// Built-in defaults rooted at `cache_root`.
    pub fn new(cache_root: NormalizedPath) -> Self {
        Self {
            cache_root,
            default_owner: DEFAULT_OWNER.to_string(),
            host: DEFAULT_HOST.to_string(),
            backend: VcsBackend::default(),
        }
    }

    /// `~/.few` for the current user.
    pub fn default_cache_root() -> Result<NormalizedPath> {
        let home = dirs::home_dir().ok_or(Error::HomeNotFound)?;
        Ok(NormalizedPath::new(home).join(FewPath::FewDir))
    }

    /// Defaults overlaid with `<cache_root>/config.toml` when it exists.
    ///
    /// Reads only; a missing cache root is not an error.
    pub fn load(cache_root: NormalizedPath) -> Result<Self> {
        let mut settings = Self::new(cache_root);
        let path = settings.config_path();

        if let Some(user) = ConfigStore::new().load_optional::<UserConfig>(&path)? {
            debug!(path = %path.as_str(), "Loaded user configuration");
            settings.apply(user);
        }
        Ok(settings)
    }

    /// Overlay the fields set in `user`.
    pub fn apply(&mut self, user: UserConfig) {
        if let Some(owner) = user.default_owner {
            self.default_owner = owner;
        }
        if let Some(host) = user.host {
            self.host = host;
        }
        if let Some(backend) = user.backend {
            self.backend = backend;
        }
    }

    pub fn with_backend(mut self, backend: VcsBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Path of the optional user configuration file.
    pub fn config_path(&self) -> NormalizedPath {
        self.cache_root.join(FewPath::UserConfig)
    }

    /// `<cache_root>/words`, one checkout per package.
    pub fn words_root(&self) -> NormalizedPath {
        self.cache_root.join(FewPath::WordsDir)
    }

    /// Resolver using this configuration's owner and host.
    pub fn resolver(&self) -> Resolver {
        Resolver::new(&self.default_owner, &self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_config_file() {
        let temp = TempDir::new().unwrap();
        let root = NormalizedPath::new(temp.path().join(".few"));

        let settings = Settings::load(root.clone()).unwrap();

        assert_eq!(settings, Settings::new(root));
        assert!(!temp.path().join(".few").exists());
    }

    #[test]
    fn user_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("config.toml"),
            "default_owner = \"acme\"\nbackend = \"libgit2\"\n",
        )
        .unwrap();

        let settings = Settings::load(NormalizedPath::new(temp.path())).unwrap();

        assert_eq!(settings.default_owner, "acme");
        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.backend, VcsBackend::Libgit2);
    }

    #[test]
    fn malformed_user_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.toml"), "default_owner = [").unwrap();

        assert!(Settings::load(NormalizedPath::new(temp.path())).is_err());
    }

    #[test]
    fn backend_parses_aliases() {
        assert_eq!("git".parse::<VcsBackend>().unwrap(), VcsBackend::Cli);
        assert_eq!("LIBGIT2".parse::<VcsBackend>().unwrap(), VcsBackend::Libgit2);
        assert!("svn".parse::<VcsBackend>().is_err());
    }

    #[test]
    fn words_root_is_under_cache_root() {
        let settings = Settings::new(NormalizedPath::new("/home/u/.few"));
        assert_eq!(settings.words_root().as_str(), "/home/u/.few/words");
    }
}
