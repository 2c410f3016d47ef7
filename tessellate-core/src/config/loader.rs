//! Configuration Loading for Tessellate Core.
//!
//! [`ConfigLoader`] locates `config.toml`, deserializes it into a
//! [`CoreConfig`] and validates the result.
//!
//! ## Validation
//!
//! - Log level and format are normalized to lowercase and checked against the known values.
//! - A relative log file path is made absolute against the application state directory
//!   and its parent directory is created.
//! - The overlay section must name a schema, a namespace path of the form `/a/b/`,
//!   and distinct, non-empty reserved key names. Toggle keys may not be reserved keys.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::config::CoreConfig;
use crate::error::{ConfigError, CoreError};
use crate::utils::fs as tess_fs;
use crate::utils::paths::{get_app_config_dir, get_app_state_dir};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Namespace for the static configuration loading functions.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates `config.toml` from the application config directory.
    ///
    /// A missing file is not an error: the default configuration is validated and returned.
    pub fn load() -> Result<CoreConfig, CoreError> {
        let config_path = get_app_config_dir()?.join(CONFIG_FILE_NAME);
        match fs::read_to_string(&config_path) {
            Ok(content) => {
                info!(path = %config_path.display(), "Loading configuration file");
                Self::load_from_str(&content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %config_path.display(), "No configuration file found, using defaults");
                let mut config = CoreConfig::default();
                Self::validate_config(&mut config)?;
                Ok(config)
            }
            Err(e) => Err(CoreError::Config(ConfigError::ReadError { path: config_path, source: e })),
        }
    }

    /// Loads and validates an explicitly named configuration file.
    ///
    /// Unlike [`ConfigLoader::load`], a missing file is reported as [`ConfigError::NotFound`].
    pub fn load_from_path(path: &Path) -> Result<CoreConfig, CoreError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::load_from_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CoreError::Config(ConfigError::NotFound { locations: vec![path.to_path_buf()] }))
            }
            Err(e) => Err(CoreError::Config(ConfigError::ReadError { path: path.to_path_buf(), source: e })),
        }
    }

    /// Parses and validates TOML text. Empty text yields the defaults.
    pub fn load_from_str(content: &str) -> Result<CoreConfig, CoreError> {
        let mut config: CoreConfig = if content.trim().is_empty() {
            CoreConfig::default()
        } else {
            toml::from_str(content).map_err(ConfigError::ParseError)?
        };
        Self::validate_config(&mut config)?;
        Ok(config)
    }

    fn validate_config(config: &mut CoreConfig) -> Result<(), CoreError> {
        let level_lower = config.logging.level.to_lowercase();
        match level_lower.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => config.logging.level = level_lower,
            _ => {
                return Err(validation_error(format!(
                    "Invalid log level: '{}'. Must be one of trace, debug, info, warn, error.",
                    config.logging.level
                )));
            }
        }

        let format_lower = config.logging.format.to_lowercase();
        match format_lower.as_str() {
            "text" | "json" => config.logging.format = format_lower,
            _ => {
                return Err(validation_error(format!(
                    "Invalid log format: '{}'. Must be one of text, json.",
                    config.logging.format
                )));
            }
        }

        if let Some(log_path) = &config.logging.file_path {
            let absolute_path = if log_path.is_absolute() {
                log_path.clone()
            } else {
                get_app_state_dir()?.join(log_path)
            };
            if let Some(parent_dir) = absolute_path.parent() {
                if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                    tess_fs::ensure_dir_exists(parent_dir)?;
                }
            }
            config.logging.file_path = Some(absolute_path);
        }

        Self::validate_overlay_config(config)
    }

    fn validate_overlay_config(config: &CoreConfig) -> Result<(), CoreError> {
        let overlay = &config.overlay;

        if overlay.extension_schema.trim().is_empty() {
            return Err(validation_error("overlay.extension_schema must not be empty".to_string()));
        }

        let path = &overlay.namespace_path;
        if !path.starts_with('/') || !path.ends_with('/') || path.contains("//") {
            return Err(validation_error(format!(
                "Invalid overlay.namespace_path: '{}'. Must start and end with '/'.",
                path
            )));
        }

        let mut reserved = HashSet::new();
        for key in overlay.reserved_keys() {
            if key.trim().is_empty() {
                return Err(validation_error("Reserved key names must not be empty".to_string()));
            }
            if !reserved.insert(key) {
                return Err(validation_error(format!("Reserved key '{}' is configured twice", key)));
            }
        }

        if let Some(toggle) = overlay.toggle_keys.iter().find(|k| reserved.contains(k.as_str())) {
            return Err(validation_error(format!("Toggle key '{}' is a reserved key", toggle)));
        }

        Ok(())
    }
}

fn validation_error(message: String) -> CoreError {
    CoreError::Config(ConfigError::ValidationError(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_load_from_str_empty_yields_defaults() {
        let config = ConfigLoader::load_from_str("   \n").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.overlay, crate::config::OverlayConfig::default());
    }

    #[test]
    fn test_load_from_str_normalizes_level_and_format() {
        let config = ConfigLoader::load_from_str("[logging]\nlevel = \"DEBUG\"\nformat = \"JSON\"\n").unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_load_from_str_invalid_level() {
        let result = ConfigLoader::load_from_str("[logging]\nlevel = \"loud\"\n");
        match result {
            Err(CoreError::Config(ConfigError::ValidationError(msg))) => assert!(msg.contains("loud")),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_load_from_str_parse_error() {
        let result = ConfigLoader::load_from_str("[logging\nlevel = ");
        assert!(matches!(result, Err(CoreError::Config(ConfigError::ParseError(_)))));
    }

    #[test]
    fn test_namespace_path_must_be_slash_delimited() {
        let result = ConfigLoader::load_from_str("[overlay]\nnamespace_path = \"org/example/\"\n");
        assert!(matches!(result, Err(CoreError::Config(ConfigError::ValidationError(_)))));
    }

    #[test]
    fn test_duplicate_reserved_keys_rejected() {
        let toml = "[overlay]\njournal_key = \"layouts-json\"\n";
        let result = ConfigLoader::load_from_str(toml);
        match result {
            Err(CoreError::Config(ConfigError::ValidationError(msg))) => assert!(msg.contains("layouts-json")),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_toggle_key_may_not_be_reserved() {
        let toml = "[overlay]\ntoggle_keys = [\"overridden-settings\"]\n";
        assert!(ConfigLoader::load_from_str(toml).is_err());
    }

    #[test]
    fn test_load_from_path_reads_file_and_creates_log_dir() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("logs/tessellate.log");
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[logging]\nfile_path = \"{}\"\n[overlay]\nextension_schema = \"org.example.tiler\"\nnamespace_path = \"/org/example/tiler/\"",
            log_path.display()
        )
        .unwrap();

        let config = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(config.overlay.extension_schema, "org.example.tiler");
        assert_eq!(config.logging.file_path, Some(log_path.clone()));
        assert!(log_path.parent().unwrap().exists());
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        match ConfigLoader::load_from_path(&missing) {
            Err(CoreError::Config(ConfigError::NotFound { locations })) => assert_eq!(locations, vec![missing]),
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}
