//! Export to and import from settings files chosen by the user.

use std::path::Path;

use tessellate_core::utils::fs::{read_to_string, write_string_to_file};
use tessellate_domain::settings_overlay::{ExportEngine, OverrideEngine};
use tracing::info;

use crate::error::TransferError;

/// Writes the filtered namespace dump to `path`. The file is only created once the export succeeded.
pub fn export_to_file(export: &ExportEngine, path: &Path) -> Result<(), TransferError> {
    let blob = export.export_to_string()?;
    write_string_to_file(path, &blob)?;
    info!(path = %path.display(), "Settings exported to file");
    Ok(())
}

/// Imports the settings stored in `path`. An unreadable file leaves the store untouched.
pub fn import_from_file(export: &ExportEngine, overrides: &mut OverrideEngine, path: &Path) -> Result<(), TransferError> {
    let blob = read_to_string(path)?;
    export.import_from_string(overrides, &blob)?;
    info!(path = %path.display(), "Settings imported from file");
    Ok(())
}
