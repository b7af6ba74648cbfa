//! Synchronization: resolve, cache, and materialize packages
//!
//! [`SyncEngine`] composes the resolver, cache store, project workspace and
//! manifest into the three operations the CLI exposes:
//!
//! - **listen_init**: prepare a project without touching any package
//! - **listen_package**: declare one package and materialize it
//! - **litany**: materialize every package the manifest declares

mod engine;
mod report;

pub use engine::SyncEngine;
pub use report::{LitanyOutcome, LitanyReport, ListenReport, PackageReport};
