use std::sync::Arc;

use tessellate_core::config::OverlayConfig;
use tracing::{debug, error, info, warn};

use super::errors::SettingsOverlayError;
use super::journal::OverrideJournal;
use super::store_iface::ConfigStore;
use super::typed_value::TypedValue;

/// Outcome of [`OverrideEngine::restore_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    /// (schema, key) pairs written back and removed from the journal.
    pub restored: Vec<(String, String)>,
    /// Pairs whose write failed; they stay journaled for a later retry.
    pub retained: Vec<(String, String)>,
}

impl RestoreSummary {
    pub fn is_complete(&self) -> bool {
        self.retained.is_empty()
    }
}

/// Applies temporary values to store keys and remembers what they replaced.
///
/// The first override of a key journals the value the store held at that moment.
/// Later overrides of the same key keep that entry, so a single restore always
/// returns the key to the user's own value. Every change to the journal is
/// written to `journal_key` in `extension_schema`.
///
/// The engine is meant to be owned by one caller and passed by reference to
/// whatever needs it; nothing stops a second engine on the same store, but the
/// two would overwrite each other's journal.
pub struct OverrideEngine {
    store: Arc<dyn ConfigStore>,
    extension_schema: String,
    journal_key: String,
    journal: OverrideJournal,
}

impl OverrideEngine {
    /// Creates an engine and loads the persisted journal. A missing, mistyped or
    /// malformed journal value starts the engine with an empty journal.
    pub fn new(store: Arc<dyn ConfigStore>, extension_schema: impl Into<String>, journal_key: impl Into<String>) -> Self {
        let extension_schema = extension_schema.into();
        let journal_key = journal_key.into();
        let journal = match store.get(&extension_schema, &journal_key) {
            Ok(TypedValue::String(text)) => OverrideJournal::decode_or_empty(&text),
            Ok(other) => {
                warn!(
                    schema = %extension_schema,
                    key = %journal_key,
                    type_tag = other.type_tag(),
                    "Override-Journal hat einen unerwarteten Typ und wird ignoriert"
                );
                OverrideJournal::new()
            }
            Err(err) => {
                warn!(error = %err, "Override-Journal nicht lesbar, beginne mit leerem Journal");
                OverrideJournal::new()
            }
        };
        if !journal.is_empty() {
            info!(entries = journal.len(), "Override-Journal geladen");
        }
        Self { store, extension_schema, journal_key, journal }
    }

    pub fn from_config(store: Arc<dyn ConfigStore>, config: &OverlayConfig) -> Self {
        Self::new(store, config.extension_schema.clone(), config.journal_key.clone())
    }

    pub fn journal(&self) -> &OverrideJournal {
        &self.journal
    }

    pub fn is_overridden(&self, schema: &str, key: &str) -> bool {
        self.journal.contains(schema, key)
    }

    /// The user's value for an overridden key, i.e. what a restore would write back.
    pub fn original_value(&self, schema: &str, key: &str) -> Option<&TypedValue> {
        self.journal.get(schema, key)
    }

    /// Writes `value` to `schema.key` and returns the value a restore would bring back.
    ///
    /// Returns `None` without touching the journal if the key cannot be read, the
    /// store rejects the write, or the key is the journal key itself. If the
    /// journal cannot be persisted the previous value is written back and `None`
    /// is returned as well.
    pub fn override_setting(&mut self, schema: &str, key: &str, value: TypedValue) -> Option<TypedValue> {
        if schema == self.extension_schema && key == self.journal_key {
            warn!(schema, key, "Das Override-Journal selbst kann nicht überschrieben werden");
            return None;
        }

        let previous = match self.journal.get(schema, key) {
            Some(original) => original.clone(),
            None => match self.store.get(schema, key) {
                Ok(current) => current,
                Err(err) => {
                    warn!(error = %err, "Override nicht möglich");
                    return None;
                }
            },
        };

        if !self.store.set(schema, key, &value) {
            warn!(error = %SettingsOverlayError::write_rejected(schema, key), "Override nicht möglich");
            return None;
        }

        // An override whose original cannot be journaled durably is undone.
        if self.journal.record(schema, key, previous.clone()) && !self.persist_journal() {
            if self.store.set(schema, key, &previous) {
                self.journal.remove(schema, key);
            } else {
                error!(schema, key, "Override konnte nicht zurückgenommen werden, Eintrag bleibt im Speicher");
            }
            return None;
        }
        debug!(schema, key, value = %value, original = %previous, "Einstellung überschrieben");
        Some(previous)
    }

    /// Writes the journaled original of `schema.key` back and forgets it.
    ///
    /// Returns `None` if the key is not overridden or the write fails; in the
    /// latter case the entry stays for a later retry.
    pub fn restore_key(&mut self, schema: &str, key: &str) -> Option<TypedValue> {
        let original = self.journal.get(schema, key)?.clone();
        if !self.store.set(schema, key, &original) {
            warn!(error = %SettingsOverlayError::write_rejected(schema, key), "Wiederherstellung fehlgeschlagen");
            return None;
        }
        self.journal.remove(schema, key);
        // A stale persisted entry only restores the value the key already holds.
        if !self.persist_journal() {
            warn!(schema, key, "Journal nach Wiederherstellung nicht gespeichert");
        }
        debug!(schema, key, value = %original, "Einstellung wiederhergestellt");
        Some(original)
    }

    /// Restores every journaled key, keeping the ones whose write fails.
    /// The journal is persisted once at the end.
    pub fn restore_all(&mut self) -> RestoreSummary {
        let mut summary = RestoreSummary::default();
        if self.journal.is_empty() {
            return summary;
        }

        let pending: Vec<(String, String, TypedValue)> = self
            .journal
            .entries()
            .map(|(schema, key, value)| (schema.to_string(), key.to_string(), value.clone()))
            .collect();
        for (schema, key, original) in pending {
            if self.store.set(&schema, &key, &original) {
                self.journal.remove(&schema, &key);
                summary.restored.push((schema, key));
            } else {
                warn!(schema = %schema, key = %key, "Wiederherstellung fehlgeschlagen, Eintrag bleibt im Journal");
                summary.retained.push((schema, key));
            }
        }
        self.persist_journal();

        info!(
            restored = summary.restored.len(),
            retained = summary.retained.len(),
            "Überschriebene Einstellungen wiederhergestellt"
        );
        summary
    }

    fn persist_journal(&self) -> bool {
        let text = match self.journal.encode() {
            Ok(text) => text,
            Err(err) => {
                error!(error = %err, "Override-Journal konnte nicht serialisiert werden");
                return false;
            }
        };
        let written = self.store.set(&self.extension_schema, &self.journal_key, &TypedValue::String(text));
        if !written {
            error!(
                schema = %self.extension_schema,
                key = %self.journal_key,
                "Override-Journal konnte nicht gespeichert werden"
            );
        }
        written
    }
}

impl std::fmt::Debug for OverrideEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideEngine")
            .field("extension_schema", &self.extension_schema)
            .field("journal_key", &self.journal_key)
            .field("journal", &self.journal)
            .finish_non_exhaustive()
    }
}
