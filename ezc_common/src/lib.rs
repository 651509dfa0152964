//! ezception Common Library
//!
//! This crate provides shared constants, configuration loading utilities and
//! translation catalog files for all ezception workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Reserved attribute names and default limits
//! - [`config`] - Configuration loading traits and types
//! - [`catalog`] - TOML translation catalogs (template → translation)
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! Add to your `Cargo.toml` with alias for shorter imports:
//! ```toml
//! [dependencies]
//! ezc = { package = "ezc_common", path = "../ezc_common" }
//! ```
//!
//! Then import:
//! ```rust
//! use ezc_common::consts::MESSAGE_PREFIX;
//! use ezc_common::config::{ConfigLoader, SharedConfig};
//! ```

pub mod catalog;
pub mod config;
pub mod consts;
pub mod prelude;
