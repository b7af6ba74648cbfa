//! Shared test utilities for the few workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: real git repositories usable as `file://` remotes
//! - [`project`]: [`project::TestProject`] with isolated project and cache roots
//! - [`fake`]: [`fake::FakeVcs`], a scripted in-memory version-control client

pub mod fake;
pub mod git;
pub mod project;
