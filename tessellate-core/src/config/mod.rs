//! Configuration Management for Tessellate Core.
//!
//! - [`types`]: [`CoreConfig`], [`LoggingConfig`] and [`OverlayConfig`].
//! - [`defaults`]: default values used when the file or a field is missing.
//! - [`loader`]: [`ConfigLoader`], which locates, parses and validates `config.toml`.
//!
//! ## Loading Process
//!
//! 1. `ConfigLoader::load()` looks for `config.toml` in the application config directory.
//! 2. A missing file yields `CoreConfig::default()`.
//! 3. An existing file is parsed as TOML; errors map to [`crate::error::ConfigError::ParseError`].
//! 4. The result is validated and normalized (log level/format, log path, overlay keys).

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{CoreConfig, LoggingConfig, OverlayConfig};
