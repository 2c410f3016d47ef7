//! # Tessellate Core Library (`tessellate-core`)
//!
//! `tessellate-core` is the foundational layer of the Tessellate settings stack.
//! It carries everything the settings overlay needs but does not itself define:
//!
//! - **Error Handling**: [`CoreError`] with the more specific [`ConfigError`] and
//!   [`LoggingError`].
//! - **Configuration**: [`CoreConfig`] loaded from TOML by [`ConfigLoader`], including
//!   the [`OverlayConfig`] that names the extension schema, its dconf namespace and
//!   the reserved/toggle keys.
//! - **Logging**: `tracing`-based logging with console and optional rolling file output.
//! - **Utilities**: XDG path resolution and small filesystem helpers.
//!
//! ```rust,ignore
//! use tessellate_core::config::ConfigLoader;
//! use tessellate_core::logging::initialize_logging;
//!
//! fn main() -> Result<(), tessellate_core::CoreError> {
//!     let config = ConfigLoader::load()?;
//!     initialize_logging(&config.logging, false)?;
//!     tracing::info!(schema = %config.overlay.extension_schema, "Tessellate core initialized.");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

pub use config::{ConfigLoader, CoreConfig, LoggingConfig, OverlayConfig};
pub use error::{ConfigError, CoreError, LoggingError};
pub use logging::{init_minimal_logging, initialize_logging};
