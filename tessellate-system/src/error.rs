use tessellate_core::CoreError;
use tessellate_domain::settings_overlay::SettingsOverlayError;
use thiserror::Error;

/// Failures running the `gsettings` and `dconf` utilities.
#[derive(Error, Debug)]
pub enum StoreCommandError {
    #[error("Failed to spawn '{command}': {source}")]
    SpawnError {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Command '{command}' failed with exit code {exit_code:?}: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },
    #[error("Child process STDIN not available for '{0}'")]
    StdInNotAvailable(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Failures moving a settings blob between a file and the store.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Settings file error: {0}")]
    File(#[from] CoreError),
    #[error("Settings overlay error: {0}")]
    Overlay(#[from] SettingsOverlayError),
}
