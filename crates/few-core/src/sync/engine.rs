//! SyncEngine implementation

use std::path::PathBuf;

use tracing::{debug, info, warn};

use few_fs::checksum::compute_tree_checksum;
use few_fs::{FewPath, NormalizedPath, replace_tree};
use few_git::{ClientInfo, VcsClient};

use crate::cache::{CacheEntry, CacheStatus, CacheStore};
use crate::config::Settings;
use crate::identity::{PackageIdentity, Resolver};
use crate::workspace::{InitReport, ProjectWorkspace};
use crate::{Error, Result};

use super::report::{LitanyOutcome, LitanyReport, ListenReport, PackageReport};

/// Engine for declaring and materializing packages
///
/// Operations run sequentially and block on the version-control client.
/// Earlier idempotent steps are never rolled back when a later one fails.
pub struct SyncEngine {
    settings: Settings,
    resolver: Resolver,
    vcs: Box<dyn VcsClient>,
}

impl SyncEngine {
    /// Create an engine driving `vcs`.
    pub fn new(settings: Settings, vcs: Box<dyn VcsClient>) -> Self {
        let resolver = settings.resolver();
        Self {
            settings,
            resolver,
            vcs,
        }
    }

    /// Create an engine using the backend named in `settings`.
    pub fn from_settings(settings: Settings, git_program: Option<PathBuf>) -> Self {
        let vcs = settings.backend.build(git_program);
        Self::new(settings, vcs)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Verify the version-control client works. Touches nothing on disk.
    pub fn preflight(&self) -> Result<ClientInfo> {
        let info = self
            .vcs
            .check_available()
            .map_err(|source| Error::PreflightError { source })?;
        debug!(program = %info.program, version = %info.version, "Version control client available");
        Ok(info)
    }

    /// Prepare the project at `root` without touching any package.
    pub fn listen_init(&self, root: &NormalizedPath) -> Result<InitReport> {
        self.workspace(root)?.initialize()
    }

    /// Declare `token` in the manifest and materialize it.
    ///
    /// # Errors
    ///
    /// Fails fast on an invalid token, a failed initial clone, a name
    /// collision, or a failed copy. A failed pull of an existing cache entry
    /// is only a warning in the report.
    pub fn listen_package(&self, root: &NormalizedPath, token: &str) -> Result<ListenReport> {
        let workspace = self.workspace(root)?;
        let init = workspace.initialize()?;

        let identity = self.resolver.resolve(token)?;
        let manifest_updated = workspace.litany().append(&identity.token)?;
        if manifest_updated {
            info!(token = %identity.token, "Added to manifest");
        }

        let mut package = self.sync_identity(&workspace, &identity)?;
        package.manifest_updated = manifest_updated;
        Ok(ListenReport { init, package })
    }

    /// Materialize every package the manifest declares, in manifest order.
    ///
    /// Per-package failures are collected; check [`LitanyReport::success`].
    ///
    /// # Errors
    ///
    /// Only failures that affect the whole run: initialization, or a manifest
    /// that cannot be read.
    pub fn litany(&self, root: &NormalizedPath) -> Result<LitanyReport> {
        let workspace = self.workspace(root)?;
        let init = workspace.initialize()?;
        let tokens = workspace.litany().load()?;
        debug!(count = tokens.len(), "Loaded manifest");

        let mut outcomes = Vec::with_capacity(tokens.len());
        for token in tokens {
            let result = self
                .resolver
                .resolve(&token)
                .and_then(|identity| self.sync_identity(&workspace, &identity));

            let outcome = match result {
                Ok(report) => LitanyOutcome::Synced(report),
                Err(e) => {
                    warn!(token = %token, error = %e, "Package failed");
                    LitanyOutcome::Failed {
                        token,
                        invalid_identifier: e.is_invalid_identifier(),
                        error: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome);
        }

        Ok(LitanyReport { init, outcomes })
    }

    fn workspace(&self, root: &NormalizedPath) -> Result<ProjectWorkspace> {
        if !root.is_dir() {
            return Err(few_fs::Error::NotADirectory {
                path: root.to_native(),
            }
            .into());
        }
        Ok(ProjectWorkspace::new(root.clone()))
    }

    fn sync_identity(
        &self,
        workspace: &ProjectWorkspace,
        identity: &PackageIdentity,
    ) -> Result<PackageReport> {
        let cache = CacheStore::new(self.settings.words_root(), self.vcs.as_ref());
        let entry = cache.ensure_fresh(identity)?;
        self.materialize(workspace, identity, entry)
    }

    /// Replace `.few/words/<name>` with a copy of the cache entry minus `.git`.
    fn materialize(
        &self,
        workspace: &ProjectWorkspace,
        identity: &PackageIdentity,
        entry: CacheEntry,
    ) -> Result<PackageReport> {
        let target = workspace.package_dir(&identity.name);
        let materialize_error = |source: few_fs::Error| Error::MaterializeError {
            name: identity.name.clone(),
            path: target.to_native(),
            source,
        };

        let exclude = [FewPath::GitDir.as_str()];
        let stats = replace_tree(&entry.path.to_native(), &target.to_native(), &exclude)
            .map_err(materialize_error)?;
        let checksum =
            compute_tree_checksum(&target.to_native(), &exclude).map_err(materialize_error)?;
        info!(
            package = %identity.name,
            files = stats.files,
            bytes = stats.bytes,
            "Materialized package"
        );

        let warnings = match &entry.status {
            CacheStatus::Stale { reason } => vec![reason.clone()],
            _ => Vec::new(),
        };

        Ok(PackageReport {
            token: identity.token.clone(),
            name: identity.name.clone(),
            remote_url: identity.remote_url.clone(),
            cache: entry.status,
            path: target.as_str().to_string(),
            files: stats.files,
            bytes: stats.bytes,
            checksum,
            manifest_updated: false,
            warnings,
        })
    }
}
