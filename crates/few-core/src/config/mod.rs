//! Settings for the engine
//!
//! Everything the engine would otherwise read from global state lives in
//! [`Settings`]: where the user cache is, how shorthand tokens resolve, and
//! which version-control backend to drive.
//!
//! # Resolution order
//!
//! 1. **Built-in defaults** - `~/.few`, owner `peterbaileyct`, host `github.com`, system `git`
//! 2. **User file** - `<cache_root>/config.toml` (TOML, or YAML/JSON by extension)
//! 3. **Caller overrides** - CLI flags and environment variables, applied by the caller
//!
//! # Example
//!
//! ```ignore
//! use few_core::config::{Settings, VcsBackend};
//!
//! let settings = Settings::load(Settings::default_cache_root()?)?
//!     .with_backend(VcsBackend::Libgit2);
//! let resolver = settings.resolver();
//! ```

mod settings;

pub use settings::{Settings, UserConfig, VcsBackend};
