//! Backend that drives the system `git` binary
//!
//! Using the installed client means clones honour the user's credential
//! helpers, SSH agent and proxy configuration.

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::client::{ClientInfo, VcsClient};
use crate::{Error, Result};

const DEFAULT_PROGRAM: &str = "git";

/// Version-control client backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// Use `git` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
        }
    }

    /// Use a specific git executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn display_command<S: AsRef<OsStr>>(&self, args: &[S]) -> String {
        let mut parts = vec![self.program.to_string_lossy().into_owned()];
        parts.extend(args.iter().map(|a| a.as_ref().to_string_lossy().into_owned()));
        parts.join(" ")
    }

    /// Run git with `args`, failing on a non-zero exit status.
    fn run<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<Output> {
        let command = self.display_command(args);
        tracing::debug!(%command, "Running git");

        let output = Command::new(&self.program)
            .args(args)
            // never block on an interactive credential prompt
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| Error::ClientUnavailable {
                program: self.program.to_string_lossy().into_owned(),
                message: if e.kind() == ErrorKind::NotFound {
                    "command not found; ensure Git is installed and on PATH".to_string()
                } else {
                    e.to_string()
                },
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!(%command, %stderr, "git exited with failure");
            return Err(Error::CommandFailed {
                command,
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        Ok(output)
    }
}

impl VcsClient for GitCli {
    fn name(&self) -> &'static str {
        "git"
    }

    fn check_available(&self) -> Result<ClientInfo> {
        let output = self.run(&["--version"])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let version = parse_version(&stdout).ok_or_else(|| Error::ClientUnavailable {
            program: self.program.to_string_lossy().into_owned(),
            message: format!("unexpected version output: {}", stdout.trim()),
        })?;

        Ok(ClientInfo {
            program: self.program.to_string_lossy().into_owned(),
            version,
        })
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Fs(few_fs::Error::io(parent, e)))?;
        }

        let args = [
            OsStr::new("clone"),
            OsStr::new("--quiet"),
            OsStr::new("--"),
            OsStr::new(url),
            dest.as_os_str(),
        ];
        self.run(&args).map_err(|e| match e {
            Error::CommandFailed { stderr, .. } => Error::CloneFailed {
                url: url.to_string(),
                message: stderr,
            },
            other => other,
        })?;
        Ok(())
    }

    fn pull(&self, path: &Path) -> Result<()> {
        if !self.is_repository(path) {
            return Err(Error::NotARepository {
                path: path.to_path_buf(),
            });
        }

        let args = [
            OsStr::new("-C"),
            path.as_os_str(),
            OsStr::new("pull"),
            OsStr::new("--ff-only"),
            OsStr::new("--quiet"),
        ];
        self.run(&args).map_err(|e| match e {
            Error::CommandFailed { stderr, .. } => Error::PullFailed {
                path: path.to_path_buf(),
                message: stderr,
            },
            other => other,
        })?;
        Ok(())
    }

    fn remote_url(&self, path: &Path) -> Result<Option<String>> {
        let args = [
            OsStr::new("-C"),
            path.as_os_str(),
            OsStr::new("config"),
            OsStr::new("--get"),
            OsStr::new("remote.origin.url"),
        ];
        match self.run(&args) {
            Ok(output) => {
                let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
                Ok(Some(url).filter(|u| !u.is_empty()))
            }
            // `git config --get` exits 1 when the key is unset
            Err(Error::CommandFailed { code: 1, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Extract the version from `git version 2.43.0` style output.
fn parse_version(output: &str) -> Option<String> {
    let version = output.trim().strip_prefix("git version ")?;
    let version = version.split_whitespace().next()?;
    Some(version.to_string())
}
