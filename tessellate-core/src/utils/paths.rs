//! XDG base directory and application-specific path resolution via `directories-next`.
//!
//! Application directories are derived from `QUALIFIER`, `ORGANIZATION` and `APPLICATION`,
//! e.g. `~/.config/tessellate` on Linux. Every function returns
//! [`ConfigError::DirectoryUnavailable`] (wrapped in [`CoreError`]) when the home
//! directory cannot be determined.

use crate::error::{ConfigError, CoreError};
use directories_next::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "Tessellate";
const APPLICATION: &str = "tessellate";

fn unavailable(dir_type: &str) -> CoreError {
    CoreError::Config(ConfigError::DirectoryUnavailable { dir_type: dir_type.to_string() })
}

/// `$XDG_CONFIG_HOME`, e.g. `~/.config`.
pub fn get_config_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| unavailable("Config Base"))
}

/// `$XDG_STATE_HOME`, falling back to `~/.local/state` on Linux and the local data dir elsewhere.
pub fn get_state_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| {
            #[cfg(target_os = "linux")]
            {
                match std::env::var("XDG_STATE_HOME") {
                    Ok(state_home) if !state_home.is_empty() => PathBuf::from(state_home),
                    _ => dirs.home_dir().join(".local/state"),
                }
            }
            #[cfg(not(target_os = "linux"))]
            {
                dirs.data_local_dir().to_path_buf()
            }
        })
        .ok_or_else(|| unavailable("State Base"))
}

/// Application config directory; `config.toml` lives here.
pub fn get_app_config_dir() -> Result<PathBuf, CoreError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| unavailable("App Config"))
}

/// Application state directory; relative log file paths are resolved against it.
pub fn get_app_state_dir() -> Result<PathBuf, CoreError> {
    get_state_base_dir().map(|base| base.join(APPLICATION))
}
