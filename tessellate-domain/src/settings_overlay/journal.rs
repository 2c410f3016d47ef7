use std::collections::BTreeMap;

use tracing::warn;

use super::errors::SettingsOverlayError;
use super::typed_value::TypedValue;

type SchemaEntries = BTreeMap<String, TypedValue>;

/// Original values of overridden keys, grouped by schema.
///
/// Persisted form is a JSON object whose values are the canonical text of each
/// [`TypedValue`]:
///
/// ```text
/// {"org.gnome.mutter.keybindings":{"toggle-tiled-left":"['<Super>Left']"}}
/// ```
///
/// Only [`super::override_engine::OverrideEngine`] mutates a journal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideJournal {
    entries: BTreeMap<String, SchemaEntries>,
}

impl OverrideJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, schema: &str, key: &str) -> Option<&TypedValue> {
        self.entries.get(schema).and_then(|keys| keys.get(key))
    }

    pub fn contains(&self, schema: &str, key: &str) -> bool {
        self.get(schema, key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of journaled (schema, key) pairs.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// All entries in (schema, key) order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &TypedValue)> {
        self.entries.iter().flat_map(|(schema, keys)| {
            keys.iter().map(move |(key, value)| (schema.as_str(), key.as_str(), value))
        })
    }

    /// Records `original` unless the pair is already journaled. Returns whether it was recorded.
    pub(crate) fn record(&mut self, schema: &str, key: &str, original: TypedValue) -> bool {
        let keys = self.entries.entry(schema.to_string()).or_default();
        if keys.contains_key(key) {
            return false;
        }
        keys.insert(key.to_string(), original);
        true
    }

    /// Removes an entry, dropping the schema map once it is empty.
    pub(crate) fn remove(&mut self, schema: &str, key: &str) -> Option<TypedValue> {
        let keys = self.entries.get_mut(schema)?;
        let removed = keys.remove(key);
        if keys.is_empty() {
            self.entries.remove(schema);
        }
        removed
    }

    pub fn encode(&self) -> Result<String, SettingsOverlayError> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Strict decode. Blank text is an empty journal.
    pub fn decode(text: &str) -> Result<Self, SettingsOverlayError> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        let mut entries: BTreeMap<String, SchemaEntries> = serde_json::from_str(text)
            .map_err(|e| SettingsOverlayError::JournalDecodeMalformed(e.to_string()))?;
        entries.retain(|_, keys| !keys.is_empty());
        Ok(Self { entries })
    }

    /// Decode that fails closed: anything malformed yields an empty journal.
    pub fn decode_or_empty(text: &str) -> Self {
        Self::decode(text).unwrap_or_else(|err| {
            warn!(error = %err, "Override-Journal ist beschädigt und wird verworfen");
            Self::new()
        })
    }
}
