//! Reports returned by [`SyncEngine`](super::SyncEngine) operations

use serde::Serialize;

use crate::cache::CacheStatus;
use crate::workspace::InitReport;

/// Outcome of resolving, caching, and materializing one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageReport {
    /// Token as recorded in the manifest
    pub token: String,
    pub name: String,
    pub remote_url: String,
    /// How the cache entry was brought up to date
    pub cache: CacheStatus,
    /// Materialized copy inside the project
    pub path: String,
    pub files: usize,
    pub bytes: u64,
    /// Checksum of the materialized tree
    pub checksum: String,
    /// Whether the token was newly added to the manifest
    pub manifest_updated: bool,
    /// Non-fatal problems, such as a failed pull
    pub warnings: Vec<String>,
}

/// Result of `few listen <package>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListenReport {
    pub init: InitReport,
    pub package: PackageReport,
}

/// Per-token result of a litany run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LitanyOutcome {
    Synced(PackageReport),
    Failed {
        token: String,
        error: String,
        /// The token itself was rejected rather than the fetch failing
        invalid_identifier: bool,
    },
}

impl LitanyOutcome {
    pub fn token(&self) -> &str {
        match self {
            Self::Synced(report) => &report.token,
            Self::Failed { token, .. } => token,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Result of `few litany`, one outcome per manifest entry in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LitanyReport {
    pub init: InitReport,
    pub outcomes: Vec<LitanyOutcome>,
}

impl LitanyReport {
    /// True only when every declared package synced.
    pub fn success(&self) -> bool {
        !self.outcomes.iter().any(LitanyOutcome::is_failure)
    }

    pub fn synced(&self) -> impl Iterator<Item = &PackageReport> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            LitanyOutcome::Synced(report) => Some(report),
            LitanyOutcome::Failed { .. } => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &LitanyOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failure())
    }
}
