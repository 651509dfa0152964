//! Prelude module for common re-exports.
//!
//! ```rust
//! use ezc_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};

// ─── Catalogs ───────────────────────────────────────────────────────
pub use crate::catalog::{Catalog, MergeReport};

// ─── Reserved Names ─────────────────────────────────────────────────
pub use crate::consts::{MESSAGE_PREFIX, PRIMARY_MESSAGE, ROOT_KIND_NAME};
