//! Invocation context
//!
//! Turns global flags into the project root and a configured [`SyncEngine`].
//! Building the context reads the optional user config file but writes
//! nothing, so a failed preflight leaves the filesystem untouched.

use std::path::Path;

use tracing::debug;

use few_core::{Settings, SyncEngine};
use few_fs::NormalizedPath;

use crate::cli::GlobalArgs;
use crate::error::{CliError, Result};

/// Everything a command needs to run.
pub struct Context {
    pub root: NormalizedPath,
    pub engine: SyncEngine,
}

impl Context {
    /// Resolve the project root and settings, then verify the version
    /// control client before any command touches the disk.
    pub fn prepare(args: &GlobalArgs, cwd: &Path) -> Result<Self> {
        let root = resolve_project_root(args.project.as_deref(), cwd)?;

        let cache_root = match &args.cache_root {
            Some(path) => NormalizedPath::new(absolute(path, cwd)),
            None => Settings::default_cache_root()?,
        };
        let mut settings = Settings::load(cache_root)?;
        if let Some(backend) = args.backend {
            settings = settings.with_backend(backend.into());
        }
        debug!(
            root = %root.as_str(),
            cache_root = %settings.cache_root.as_str(),
            backend = %settings.backend,
            "Resolved settings"
        );

        let engine = SyncEngine::from_settings(settings, args.git.clone());
        engine.preflight()?;

        Ok(Self { root, engine })
    }
}

fn resolve_project_root(project: Option<&Path>, cwd: &Path) -> Result<NormalizedPath> {
    let path = match project {
        Some(path) => absolute(path, cwd),
        None => cwd.to_path_buf(),
    };
    if !path.is_dir() {
        return Err(CliError::user(format!(
            "Project directory does not exist: {}",
            path.display()
        )));
    }
    Ok(NormalizedPath::canonicalize(&path)?)
}

fn absolute(path: &Path, cwd: &Path) -> std::path::PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
