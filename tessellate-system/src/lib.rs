//! System layer of the Tessellate settings stack.
//!
//! Provides [`DconfConfigStore`], the [`ConfigStore`] used on a real desktop, and
//! [`open_settings_overlay`] to wire it into the domain engines from configuration.
//! [`open_configured_settings_overlay`] additionally loads `config.toml` and sets up logging.
//! [`export_to_file`] and [`import_from_file`] move settings through files.

pub mod dconf_store;
pub mod error;
pub mod transfer;

use std::path::Path;
use std::sync::Arc;

use tessellate_core::config::{ConfigLoader, CoreConfig, OverlayConfig};
use tessellate_core::error::CoreError;
use tessellate_core::logging::initialize_logging;
use tessellate_domain::settings_overlay::{ConfigStore, ExportEngine, OverrideEngine};
use tracing::info;

pub use dconf_store::{CommandOutput, CommandRunner, DconfConfigStore, SystemCommandRunner};
pub use error::{StoreCommandError, TransferError};
pub use transfer::{export_to_file, import_from_file};

/// Creates the engines on top of the desktop's dconf database.
pub fn open_settings_overlay(config: &OverlayConfig) -> (OverrideEngine, ExportEngine) {
    open_settings_overlay_with(SystemCommandRunner, config)
}

/// Like [`open_settings_overlay`], with the given command runner.
pub fn open_settings_overlay_with<R>(runner: R, config: &OverlayConfig) -> (OverrideEngine, ExportEngine)
where
    R: CommandRunner + 'static,
{
    let store: Arc<dyn ConfigStore> = Arc::new(DconfConfigStore::with_runner(runner));
    let overrides = OverrideEngine::from_config(store.clone(), config);
    let export = ExportEngine::from_config(store, config);
    (overrides, export)
}

/// Loads the core configuration, installs logging from it and opens the engines on dconf.
///
/// Without `config_path` the application's `config.toml` is used, falling back to the
/// defaults when it does not exist.
pub fn open_configured_settings_overlay(
    config_path: Option<&Path>,
) -> Result<(OverrideEngine, ExportEngine), CoreError> {
    open_configured_settings_overlay_with(SystemCommandRunner, config_path)
}

/// Like [`open_configured_settings_overlay`], with the given command runner.
pub fn open_configured_settings_overlay_with<R>(
    runner: R,
    config_path: Option<&Path>,
) -> Result<(OverrideEngine, ExportEngine), CoreError>
where
    R: CommandRunner + 'static,
{
    let config: CoreConfig = match config_path {
        Some(path) => ConfigLoader::load_from_path(path)?,
        None => ConfigLoader::load()?,
    };
    // A host that already installed a subscriber keeps it.
    initialize_logging(&config.logging, true)?;
    info!(
        schema = %config.overlay.extension_schema,
        path = %config.overlay.namespace_path,
        "Opening settings overlay"
    );
    Ok(open_settings_overlay_with(runner, &config.overlay))
}
