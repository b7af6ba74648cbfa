//! [`FakeVcs`]: a scripted version-control client.
//!
//! Remotes are published in memory as lists of files. A "clone" writes those
//! files plus a `.git` marker directory; a "pull" rewrites them from the
//! current published state. Individual URLs can be told to fail.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use few_git::{ClientInfo, Error, Result, VcsClient};

const ORIGIN_FILE: &str = "origin";

/// A recorded call made against the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Clone { url: String },
    Pull { name: String },
}

#[derive(Debug, Default)]
struct State {
    remotes: BTreeMap<String, Vec<(String, String)>>,
    failing_clones: BTreeSet<String>,
    failing_pulls: BTreeSet<String>,
    unavailable: bool,
    calls: Vec<Call>,
}

/// In-memory version-control client. Clones share state, so a test can keep
/// one handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct FakeVcs {
    state: Arc<Mutex<State>>,
}

impl FakeVcs {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Publish (or republish) the files served for `url`.
    pub fn publish(&self, url: &str, files: &[(&str, &str)]) -> &Self {
        self.state().remotes.insert(
            url.to_string(),
            files
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
        );
        self
    }

    /// Make every clone of `url` fail after leaving partial output behind.
    pub fn fail_clone(&self, url: &str) -> &Self {
        self.state().failing_clones.insert(url.to_string());
        self
    }

    /// Make every pull of `url` fail.
    pub fn fail_pull(&self, url: &str) -> &Self {
        self.state().failing_pulls.insert(url.to_string());
        self
    }

    /// Make `check_available` fail, as if no client were installed.
    pub fn set_unavailable(&self) -> &Self {
        self.state().unavailable = true;
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn clone_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Clone { .. }))
            .count()
    }

    pub fn pull_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Pull { .. }))
            .count()
    }
}

impl VcsClient for FakeVcs {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn check_available(&self) -> Result<ClientInfo> {
        if self.state().unavailable {
            return Err(Error::ClientUnavailable {
                program: "fake".to_string(),
                message: "disabled by test".to_string(),
            });
        }
        Ok(ClientInfo {
            program: "fake".to_string(),
            version: "0.0.0".to_string(),
        })
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::Clone {
            url: url.to_string(),
        });

        if state.failing_clones.contains(url) {
            // leave debris behind so callers must clean up after failure
            let _ = fs::create_dir_all(dest.join(".git"));
            let _ = fs::write(dest.join("partial"), "half-written");
            return Err(Error::CloneFailed {
                url: url.to_string(),
                message: "simulated clone failure".to_string(),
            });
        }

        let files = state
            .remotes
            .get(url)
            .cloned()
            .ok_or_else(|| Error::CloneFailed {
                url: url.to_string(),
                message: "repository not found".to_string(),
            })?;
        drop(state);

        write_checkout(dest, url, &files)
    }

    fn pull(&self, path: &Path) -> Result<()> {
        let url = self.remote_url(path)?.ok_or_else(|| Error::NotARepository {
            path: path.to_path_buf(),
        })?;

        let mut state = self.state();
        state.calls.push(Call::Pull {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        });

        if state.failing_pulls.contains(&url) {
            return Err(Error::PullFailed {
                path: path.to_path_buf(),
                message: "simulated network failure".to_string(),
            });
        }
        let files = state.remotes.get(&url).cloned().unwrap_or_default();
        drop(state);

        for entry in fs::read_dir(path).map_err(|e| Error::Fs(few_fs::Error::io(path, e)))? {
            let entry = entry.map_err(|e| Error::Fs(few_fs::Error::io(path, e)))?;
            if entry.file_name() == ".git" {
                continue;
            }
            let entry_path = entry.path();
            let removed = if entry_path.is_dir() {
                fs::remove_dir_all(&entry_path)
            } else {
                fs::remove_file(&entry_path)
            };
            removed.map_err(|e| Error::Fs(few_fs::Error::io(&entry_path, e)))?;
        }
        write_checkout(path, &url, &files)
    }

    fn remote_url(&self, path: &Path) -> Result<Option<String>> {
        let origin = path.join(".git").join(ORIGIN_FILE);
        match fs::read_to_string(&origin) {
            Ok(url) => Ok(Some(url.trim().to_string())),
            Err(_) if path.join(".git").is_dir() => Ok(None),
            Err(_) => Err(Error::NotARepository {
                path: path.to_path_buf(),
            }),
        }
    }
}

fn write_checkout(dest: &Path, url: &str, files: &[(String, String)]) -> Result<()> {
    let io_err = |p: &Path, e: std::io::Error| Error::Fs(few_fs::Error::io(p, e));

    let git_dir = dest.join(".git");
    fs::create_dir_all(&git_dir).map_err(|e| io_err(&git_dir, e))?;
    fs::write(git_dir.join(ORIGIN_FILE), url).map_err(|e| io_err(&git_dir, e))?;

    for (relative, content) in files {
        let file = dest.join(relative);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        fs::write(&file, content).map_err(|e| io_err(&file, e))?;
    }
    Ok(())
}
