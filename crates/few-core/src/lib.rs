//! Package synchronization engine for few
//!
//! A project declares its dependencies ("words") in `few.litany.yaml`. This
//! crate resolves each declared token to a remote, keeps one checkout per
//! package in the user cache, and copies that checkout into the project:
//!
//! - **Identifier resolution**: `name`, `owner/name`, or a full remote URL
//! - **Cache store**: `~/.few/words/<name>`, cloned once and pulled afterwards
//! - **Project workspace**: `.few/words`, `PARSEME.md`, README notice, `.gitignore`
//! - **Manifest**: order-preserving, comment-preserving appends
//! - **SyncEngine**: `listen_init`, `listen_package`, and `litany`
//!
//! # Architecture
//!
//! ```text
//!              few-cli
//!                 |
//!             few-core
//!                 |
//!         +-------+-------+
//!         |               |
//!      few-fs          few-git
//! ```
//!
//! # Example
//!
//! ```ignore
//! use few_core::{Settings, SyncEngine};
//! use few_fs::NormalizedPath;
//!
//! let settings = Settings::load(Settings::default_cache_root()?)?;
//! let engine = SyncEngine::from_settings(settings, None);
//! engine.preflight()?;
//! let report = engine.litany(&NormalizedPath::new("."))?;
//! assert!(report.success());
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod identity;
pub mod manifest;
pub mod sync;
pub mod workspace;

pub use cache::{CacheEntry, CacheStatus, CacheStore};
pub use config::{Settings, UserConfig, VcsBackend};
pub use error::{Error, Result};
pub use identity::{DEFAULT_HOST, DEFAULT_OWNER, PackageIdentity, Resolver, resolve};
pub use manifest::Litany;
pub use sync::{LitanyOutcome, LitanyReport, ListenReport, PackageReport, SyncEngine};
pub use workspace::{InitAction, InitReport, ProjectWorkspace};
