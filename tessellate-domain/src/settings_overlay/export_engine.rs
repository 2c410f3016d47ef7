use std::collections::BTreeSet;
use std::sync::Arc;

use tessellate_core::config::OverlayConfig;
use tracing::{debug, error, info, warn};

use super::errors::SettingsOverlayError;
use super::key_file::KeyFile;
use super::override_engine::{OverrideEngine, RestoreSummary};
use super::reserved_keys::ReservedKeySet;
use super::store_iface::ConfigStore;
use super::typed_value::TypedValue;

/// Export, import and factory reset of the extension's settings namespace.
pub struct ExportEngine {
    store: Arc<dyn ConfigStore>,
    extension_schema: String,
    namespace_path: String,
    reserved: ReservedKeySet,
    toggle_keys: Vec<String>,
}

impl ExportEngine {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        extension_schema: impl Into<String>,
        namespace_path: impl Into<String>,
        reserved: ReservedKeySet,
        toggle_keys: Vec<String>,
    ) -> Self {
        Self {
            store,
            extension_schema: extension_schema.into(),
            namespace_path: namespace_path.into(),
            reserved,
            toggle_keys,
        }
    }

    pub fn from_config(store: Arc<dyn ConfigStore>, config: &OverlayConfig) -> Self {
        Self::new(
            store,
            config.extension_schema.clone(),
            config.namespace_path.clone(),
            ReservedKeySet::from_config(config),
            config.toggle_keys.clone(),
        )
    }

    pub fn reserved_keys(&self) -> &ReservedKeySet {
        &self.reserved
    }

    /// Dumps the namespace without its reserved keys.
    ///
    /// # Errors
    /// `DumpFailed` or `DumpEmpty` if the store produced nothing usable,
    /// `KeyFileParse` for an unreadable dump, `ExportEmpty` if only reserved keys were set.
    pub fn export_to_string(&self) -> Result<String, SettingsOverlayError> {
        let path = &self.namespace_path;
        let dump = self.store.dump_namespace(path).map_err(|err| match err {
            failed @ SettingsOverlayError::DumpFailed { .. } => failed,
            other => SettingsOverlayError::DumpFailed { path: path.clone(), reason: other.to_string() },
        })?;
        if dump.trim().is_empty() {
            return Err(SettingsOverlayError::DumpEmpty { path: path.clone() });
        }

        let mut key_file = KeyFile::parse(&dump)?;
        self.strip_reserved(&mut key_file);
        if key_file.is_empty() {
            return Err(SettingsOverlayError::ExportEmpty { path: path.clone() });
        }

        let data = key_file.to_data();
        info!(path = %path, groups = key_file.groups().len(), "Einstellungen exportiert");
        Ok(data)
    }

    /// Replaces the namespace with the settings in `blob`.
    ///
    /// The namespace is reset to defaults first. If the blob is unusable or the
    /// store fails to load it, the namespace is left at its defaults and an error
    /// is returned; none of the blob's settings should be assumed applied.
    /// Reserved keys in `blob` are ignored.
    pub fn import_from_string(&self, overrides: &mut OverrideEngine, blob: &str) -> Result<(), SettingsOverlayError> {
        let path = &self.namespace_path;
        self.restore_to_default(overrides);

        if blob.trim().is_empty() {
            warn!(path = %path, "Import abgebrochen: keine Daten");
            return Err(SettingsOverlayError::DumpEmpty { path: path.clone() });
        }
        let mut key_file = KeyFile::parse(blob).map_err(|err| {
            warn!(path = %path, error = %err, "Import abgebrochen");
            err
        })?;
        if key_file.is_empty() {
            warn!(path = %path, "Import abgebrochen: keine Einträge");
            return Err(SettingsOverlayError::DumpEmpty { path: path.clone() });
        }

        let stripped = self.strip_reserved(&mut key_file);
        if stripped > 0 {
            warn!(path = %path, count = stripped, "Reservierte Schlüssel im Import werden ignoriert");
        }
        if key_file.is_empty() {
            warn!(path = %path, "Import enthält nur reservierte Schlüssel, nichts zu laden");
            return Ok(());
        }

        if !self.store.load_namespace(path, &key_file.to_data()) {
            error!(path = %path, "Import fehlgeschlagen, setze Einstellungen zurück");
            self.restore_to_default(overrides);
            return Err(SettingsOverlayError::LoadFailed {
                path: path.clone(),
                reason: "Laden wurde nicht vollständig abgeschlossen".to_string(),
            });
        }

        info!(path = %path, "Einstellungen importiert");
        Ok(())
    }

    /// Switches the toggle keys off, restores all overrides and resets every other
    /// non-reserved key of the extension schema and of the schemas mounted below it.
    pub fn restore_to_default(&self, overrides: &mut OverrideEngine) -> RestoreSummary {
        let schema = &self.extension_schema;
        for toggle in &self.toggle_keys {
            if !self.store.set(schema, toggle, &TypedValue::Boolean(false)) {
                warn!(schema = %schema, key = %toggle, "Schalter konnte nicht deaktiviert werden");
            }
        }

        let summary = overrides.restore_all();

        let mut visited = BTreeSet::new();
        let mut pending = vec![schema.clone()];
        while let Some(current) = pending.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            let mut reset = 0usize;
            for key in self.store.list_keys(&current) {
                if self.reserved.contains(&key) || (current == *schema && self.toggle_keys.contains(&key)) {
                    continue;
                }
                self.store.reset_to_default(&current, &key);
                reset += 1;
            }
            debug!(schema = %current, reset, "Schlüssel auf Standardwerte zurückgesetzt");
            pending.extend(self.store.list_children(&current));
        }
        info!(schema = %schema, schemas = visited.len(), "Einstellungen auf Standardwerte zurückgesetzt");
        summary
    }

    fn strip_reserved(&self, key_file: &mut KeyFile) -> usize {
        let removed = self.reserved.iter().map(|key| key_file.remove_key_everywhere(key)).sum();
        key_file.drop_empty_groups();
        removed
    }
}

impl std::fmt::Debug for ExportEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportEngine")
            .field("extension_schema", &self.extension_schema)
            .field("namespace_path", &self.namespace_path)
            .field("reserved", &self.reserved)
            .field("toggle_keys", &self.toggle_keys)
            .finish_non_exhaustive()
    }
}
