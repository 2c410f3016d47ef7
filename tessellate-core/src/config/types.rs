//! Configuration Data Structures for Tessellate Core.
//!
//! # Key Structs
//! - [`CoreConfig`]: The root configuration structure.
//! - [`LoggingConfig`]: Configuration of the logging subsystem.
//! - [`OverlayConfig`]: Where the extension's settings live and which of its keys are special.
//!
//! All structs apply defaults from [`super::defaults`] for missing fields and
//! reject unknown fields via `#[serde(deny_unknown_fields)]`.

use super::defaults;
use serde::Deserialize;
use std::path::PathBuf;

/// Configuration settings for the logging subsystem.
///
/// ```
/// use tessellate_core::config::LoggingConfig;
///
/// let default_log_config = LoggingConfig::default();
/// assert_eq!(default_log_config.level, "info");
/// assert_eq!(default_log_config.file_path, None);
/// assert_eq!(default_log_config.format, "text");
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level: "trace", "debug", "info", "warn" or "error" (case-insensitive).
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths are resolved against the application state directory.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_core_logging_config()
    }
}

/// Describes the extension's own settings tree.
///
/// The `journal_key`, `version_key` and `layouts_key` together form the reserved
/// key set: they are never exported and never overwritten by an import.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlayConfig {
    /// Schema id of the extension, e.g. `org.gnome.shell.extensions.tilingshell`.
    #[serde(default = "defaults::default_extension_schema")]
    pub extension_schema: String,
    /// dconf path of the extension's namespace; must start and end with `/`.
    #[serde(default = "defaults::default_namespace_path")]
    pub namespace_path: String,
    /// String key holding the persisted override journal.
    #[serde(default = "defaults::default_journal_key")]
    pub journal_key: String,
    #[serde(default = "defaults::default_version_key")]
    pub version_key: String,
    #[serde(default = "defaults::default_layouts_key")]
    pub layouts_key: String,
    /// Boolean feature switches forced to `false` at the start of a reset.
    #[serde(default = "defaults::default_toggle_keys")]
    pub toggle_keys: Vec<String>,
}

impl OverlayConfig {
    /// The reserved key names, journal key first.
    pub fn reserved_keys(&self) -> [&str; 3] {
        [&self.journal_key, &self.version_key, &self.layouts_key]
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        defaults::default_core_overlay_config()
    }
}

/// Root configuration structure.
///
/// ```
/// use tessellate_core::config::CoreConfig;
///
/// let toml_str = r#"
/// [logging]
/// level = "warn"
///
/// [overlay]
/// extension_schema = "org.example.tiler"
/// namespace_path = "/org/example/tiler/"
/// "#;
/// let loaded: CoreConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(loaded.logging.level, "warn");
/// assert_eq!(loaded.overlay.journal_key, "overridden-settings");
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default = "defaults::default_core_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_core_overlay_config")]
    pub overlay: OverlayConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            logging: defaults::default_core_logging_config(),
            overlay: defaults::default_core_overlay_config(),
        }
    }
}
