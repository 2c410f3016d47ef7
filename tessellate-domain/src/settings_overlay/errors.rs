use super::typed_value::TypedValueParseError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsOverlayError {
    /// `set()` was refused (read-only key or type mismatch).
    #[error("Schreibzugriff auf {schema}.{key} wurde abgelehnt")]
    StoreWriteRejected { schema: String, key: String },

    /// The schema or key does not exist in the store.
    #[error("Einstellung {schema}.{key} ist nicht verfügbar")]
    StoreReadUnavailable { schema: String, key: String },

    #[error("Export von '{path}' lieferte keine Daten")]
    DumpEmpty { path: String },

    #[error("Export von '{path}' fehlgeschlagen: {reason}")]
    DumpFailed { path: String, reason: String },

    /// The store could not load a transport blob. By the time this is returned
    /// the namespace has been reset to its defaults again.
    #[error("Import fehlgeschlagen, Einstellungen wurden auf Standardwerte zurückgesetzt ('{path}': {reason})")]
    LoadFailed { path: String, reason: String },

    /// Recoverable: the engine falls back to an empty journal.
    #[error("Override-Journal konnte nicht dekodiert werden: {0}")]
    JournalDecodeMalformed(String),

    #[error("Ungültiger Einstellungswert: {0}")]
    ValueParse(#[from] TypedValueParseError),

    #[error("Ungültige Transportdaten in Zeile {line}: {reason}")]
    KeyFileParse { line: usize, reason: String },

    /// Only reserved keys were left after filtering a dump.
    #[error("Export von '{path}' enthält nach dem Filtern reservierter Schlüssel keine Daten")]
    ExportEmpty { path: String },

    #[error("Serialisierungsfehler: {0}")]
    SerializationError(String),
}

impl SettingsOverlayError {
    pub fn write_rejected(schema: impl Into<String>, key: impl Into<String>) -> Self {
        SettingsOverlayError::StoreWriteRejected { schema: schema.into(), key: key.into() }
    }

    pub fn read_unavailable(schema: impl Into<String>, key: impl Into<String>) -> Self {
        SettingsOverlayError::StoreReadUnavailable { schema: schema.into(), key: key.into() }
    }

    /// True for the failures an import reports after resetting the namespace.
    pub fn is_import_failure(&self) -> bool {
        matches!(
            self,
            SettingsOverlayError::LoadFailed { .. }
                | SettingsOverlayError::DumpEmpty { .. }
                | SettingsOverlayError::KeyFileParse { .. }
        )
    }
}

impl From<serde_json::Error> for SettingsOverlayError {
    fn from(err: serde_json::Error) -> Self {
        SettingsOverlayError::SerializationError(err.to_string())
    }
}
