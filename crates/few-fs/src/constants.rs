//! Well-known file and directory names used by few.

use std::path::Path;

/// Names few creates or inspects inside a project or the user cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FewPath {
    /// The `.few` directory (project workspace and user cache root)
    FewDir,
    /// The `words` directory holding one subdirectory per package
    WordsDir,
    /// The project manifest `few.litany.yaml`
    LitanyFile,
    /// The machine-readable project description `PARSEME.md`
    ParsemeFile,
    /// The human-facing `README.md`
    ReadmeFile,
    /// The project's `.gitignore`
    GitignoreFile,
    /// The `.git` directory (or gitlink file) of a checkout
    GitDir,
    /// The optional user configuration file inside the cache root
    UserConfig,
}

impl FewPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FewDir => ".few",
            Self::WordsDir => "words",
            Self::LitanyFile => "few.litany.yaml",
            Self::ParsemeFile => "PARSEME.md",
            Self::ReadmeFile => "README.md",
            Self::GitignoreFile => ".gitignore",
            Self::GitDir => ".git",
            Self::UserConfig => "config.toml",
        }
    }
}

impl AsRef<Path> for FewPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for FewPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for FewPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
