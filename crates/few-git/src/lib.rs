//! Version-control client abstraction for few
//!
//! The cache store only needs four things from version control: clone a
//! remote, update a checkout, report a checkout's origin URL, and confirm the
//! client is usable at all. [`VcsClient`] captures that contract; [`GitCli`]
//! drives the system `git` binary and [`LibGit`] uses libgit2 in-process.

pub mod cli;
pub mod client;
pub mod error;
pub mod libgit;

pub use cli::GitCli;
pub use client::{ClientInfo, VcsClient, same_remote};
pub use error::{Error, Result};
pub use libgit::LibGit;
