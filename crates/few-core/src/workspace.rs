//! Project workspace initialization
//!
//! Ensures a consuming project has everything few expects before any package
//! is touched: the `.few/words` directory, the manifest, `PARSEME.md`, the
//! README notice pointing language models at it, and `.gitignore` entries for
//! the materialized packages. Each step is skipped when already satisfied, so
//! running [`ProjectWorkspace::initialize`] twice leaves the same bytes on
//! disk as running it once.

use serde::Serialize;
use tracing::{debug, info};

use few_fs::{FewPath, NormalizedPath, io};

use crate::Result;
use crate::manifest::Litany;

/// First line of every README in a few project.
pub const README_NOTICE: &str =
    "<!-- LLMs: read PARSEME.md for machine-readable project documentation. -->";

/// Default `PARSEME.md` for projects that do not have one yet.
pub const PARSEME_TEMPLATE: &str = include_str!("../templates/PARSEME.md");

/// Lines `.gitignore` must contain.
pub const IGNORE_ENTRIES: [&str; 2] = [".few/", "few.litany.yaml"];

/// A change made while initializing a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum InitAction {
    CreatedParseme,
    CreatedReadme,
    PrependedReadmeNotice,
    CreatedWordsDir,
    CreatedManifest,
    AddedIgnoreEntry(String),
}

impl std::fmt::Display for InitAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreatedParseme => write!(f, "created {}", FewPath::ParsemeFile),
            Self::CreatedReadme => write!(f, "created {}", FewPath::ReadmeFile),
            Self::PrependedReadmeNotice => write!(f, "added LLM notice to {}", FewPath::ReadmeFile),
            Self::CreatedWordsDir => write!(f, "created {}/{}/", FewPath::FewDir, FewPath::WordsDir),
            Self::CreatedManifest => write!(f, "created {}", FewPath::LitanyFile),
            Self::AddedIgnoreEntry(entry) => {
                write!(f, "added '{}' to {}", entry, FewPath::GitignoreFile)
            }
        }
    }
}

/// What [`ProjectWorkspace::initialize`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InitReport {
    pub actions: Vec<InitAction>,
}

impl InitReport {
    /// True when the project was already fully initialized.
    pub fn is_noop(&self) -> bool {
        self.actions.is_empty()
    }
}

/// The few-managed parts of a consuming project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectWorkspace {
    root: NormalizedPath,
}

impl ProjectWorkspace {
    pub fn new(root: NormalizedPath) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// `.few/`
    pub fn few_dir(&self) -> NormalizedPath {
        self.root.join(FewPath::FewDir)
    }

    /// `.few/words/`
    pub fn words_dir(&self) -> NormalizedPath {
        self.few_dir().join(FewPath::WordsDir)
    }

    /// `.few/words/<name>/`
    pub fn package_dir(&self, name: &str) -> NormalizedPath {
        self.words_dir().join(name)
    }

    pub fn litany(&self) -> Litany {
        Litany::for_project(&self.root)
    }

    /// Bring the project up to the expected layout, creating or appending
    /// only what is missing.
    pub fn initialize(&self) -> Result<InitReport> {
        let mut report = InitReport::default();

        self.ensure_parseme(&mut report)?;
        self.ensure_readme_notice(&mut report)?;

        if io::ensure_dir(&self.words_dir())? {
            report.actions.push(InitAction::CreatedWordsDir);
        }
        if self.litany().create_empty()? {
            report.actions.push(InitAction::CreatedManifest);
        }

        self.ensure_ignore_entries(&mut report)?;

        if report.is_noop() {
            debug!(root = %self.root.as_str(), "Project already initialized");
        } else {
            info!(root = %self.root.as_str(), changes = report.actions.len(), "Initialized project");
        }
        Ok(report)
    }

    fn ensure_parseme(&self, report: &mut InitReport) -> Result<()> {
        let path = self.root.join(FewPath::ParsemeFile);
        if !path.exists() {
            io::write_text(&path, PARSEME_TEMPLATE)?;
            report.actions.push(InitAction::CreatedParseme);
        }
        Ok(())
    }

    fn ensure_readme_notice(&self, report: &mut InitReport) -> Result<()> {
        let path = self.root.join(FewPath::ReadmeFile);
        match io::read_text_if_exists(&path)? {
            Some(content) if content.starts_with(README_NOTICE) => {}
            Some(content) => {
                io::write_text(&path, &format!("{}\n\n{}", README_NOTICE, content))?;
                report.actions.push(InitAction::PrependedReadmeNotice);
            }
            None => {
                io::write_text(&path, &format!("{}\n", README_NOTICE))?;
                report.actions.push(InitAction::CreatedReadme);
            }
        }
        Ok(())
    }

    fn ensure_ignore_entries(&self, report: &mut InitReport) -> Result<()> {
        let path = self.root.join(FewPath::GitignoreFile);
        let content = io::read_text_if_exists(&path)?.unwrap_or_default();

        let missing: Vec<&str> = IGNORE_ENTRIES
            .into_iter()
            .filter(|entry| !has_ignore_entry(&content, entry))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }

        let mut addition = String::new();
        if !content.is_empty() && !content.ends_with('\n') {
            addition.push('\n');
        }
        for entry in missing {
            addition.push_str(entry);
            addition.push('\n');
            report.actions.push(InitAction::AddedIgnoreEntry(entry.to_string()));
        }
        io::append_text(&path, &addition)?;
        Ok(())
    }
}

/// Whether `content` already has a line equivalent to `entry`.
///
/// Leading and trailing slashes are ignored, so `.few`, `/.few` and `.few/`
/// all match `.few/`.
fn has_ignore_entry(content: &str, entry: &str) -> bool {
    let wanted = entry.trim_matches('/');
    content
        .lines()
        .map(|line| line.trim().trim_matches('/'))
        .any(|line| line == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignore_entry_equivalents() {
        for line in [".few", ".few/", "/.few", "/.few/", "  .few/  "] {
            assert!(has_ignore_entry(line, ".few/"), "{line}");
        }
        assert!(!has_ignore_entry(".fewer\n.few/words\n", ".few/"));
        assert!(!has_ignore_entry("# .few/\n", ".few/"));
    }

    #[test]
    fn template_is_not_empty() {
        assert!(PARSEME_TEMPLATE.starts_with("# PARSEME.md"));
    }
}
