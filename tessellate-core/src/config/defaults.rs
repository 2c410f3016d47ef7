//! Default configuration values for Tessellate Core.
//!
//! These functions back the `serde(default = ...)` attributes in [`super::types`].
//! The overlay defaults mirror the key names the tiling extension ships in its
//! GSettings schema.

use super::types::{LoggingConfig, OverlayConfig};
use std::path::PathBuf;

/// Returns the default `LoggingConfig`.
pub(crate) fn default_core_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

/// Returns the default log level string (`"info"`).
pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

/// Returns the default log file path (`None`, no file logging).
pub(crate) fn default_log_file_path() -> Option<PathBuf> {
    None
}

/// Returns the default log format string (`"text"`).
pub(crate) fn default_log_format() -> String {
    "text".to_string()
}

/// Returns the default `OverlayConfig`.
pub(crate) fn default_core_overlay_config() -> OverlayConfig {
    OverlayConfig {
        extension_schema: default_extension_schema(),
        namespace_path: default_namespace_path(),
        journal_key: default_journal_key(),
        version_key: default_version_key(),
        layouts_key: default_layouts_key(),
        toggle_keys: default_toggle_keys(),
    }
}

pub(crate) fn default_extension_schema() -> String {
    "org.gnome.shell.extensions.tilingshell".to_string()
}

pub(crate) fn default_namespace_path() -> String {
    "/org/gnome/shell/extensions/tilingshell/".to_string()
}

/// Key in the extension schema that holds the serialized override journal.
pub(crate) fn default_journal_key() -> String {
    "overridden-settings".to_string()
}

pub(crate) fn default_version_key() -> String {
    "last-version-name-installed".to_string()
}

pub(crate) fn default_layouts_key() -> String {
    "layouts-json".to_string()
}

/// Feature switches that are turned off before a reset so the extension
/// releases whatever it overrode on their behalf.
pub(crate) fn default_toggle_keys() -> Vec<String> {
    vec![
        "enable-move-keybindings".to_string(),
        "enable-autotiling".to_string(),
        "enable-tiling-system".to_string(),
        "enable-snap-assist".to_string(),
    ]
}
