//! Filesystem primitives for few
//!
//! Path handling, atomic text writes, the filtered tree copy used to
//! materialize packages, tree checksums, and format-agnostic config loading.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod copy;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::FewPath;
pub use copy::{CopyStats, copy_tree_filtered, replace_tree};
pub use error::{Error, Result};
pub use path::{NormalizedPath, is_safe_segment};
