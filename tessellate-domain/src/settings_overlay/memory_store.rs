//! In-process [`ConfigStore`] with dconf semantics: schemas are mounted at paths,
//! keys carry a typed default, and only user-set values show up in a dump.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use super::errors::SettingsOverlayError;
use super::key_file::KeyFile;
use super::store_iface::ConfigStore;
use super::typed_value::TypedValue;

#[derive(Debug, Clone, PartialEq)]
pub struct KeyDefinition {
    pub default: TypedValue,
    pub writable: bool,
}

/// A schema mounted at a dconf path such as `/org/gnome/mutter/`.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDefinition {
    pub id: String,
    pub path: String,
    pub keys: BTreeMap<String, KeyDefinition>,
}

impl SchemaDefinition {
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self { id: id.into(), path: path.into(), keys: BTreeMap::new() }
    }

    pub fn with_key(mut self, key: impl Into<String>, default: impl Into<TypedValue>) -> Self {
        self.keys.insert(key.into(), KeyDefinition { default: default.into(), writable: true });
        self
    }

    pub fn with_read_only_key(mut self, key: impl Into<String>, default: impl Into<TypedValue>) -> Self {
        self.keys.insert(key.into(), KeyDefinition { default: default.into(), writable: false });
        self
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    schemas: BTreeMap<String, SchemaDefinition>,
    /// User values by (schema id, key).
    values: HashMap<(String, String), TypedValue>,
}

impl MemoryState {
    fn definition(&self, schema: &str, key: &str) -> Option<&KeyDefinition> {
        self.schemas.get(schema).and_then(|s| s.keys.get(key))
    }

    fn write(&mut self, schema: &str, key: &str, value: &TypedValue) -> bool {
        let accepted = match self.definition(schema, key) {
            Some(def) => def.writable && def.default.type_tag() == value.type_tag(),
            None => false,
        };
        if accepted {
            self.values.insert((schema.to_string(), key.to_string()), value.clone());
        } else {
            debug!(schema, key, type_tag = value.type_tag(), "Schreibzugriff abgelehnt");
        }
        accepted
    }

    fn schema_at(&self, path: &str) -> Option<&SchemaDefinition> {
        self.schemas.values().find(|s| s.path == path)
    }
}

#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    state: Mutex<MemoryState>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(self, schema: SchemaDefinition) -> Self {
        self.register_schema(schema);
        self
    }

    /// Registers or replaces a schema. User values of the previous definition are dropped.
    pub fn register_schema(&self, schema: SchemaDefinition) {
        let mut state = self.state();
        let id = schema.id.clone();
        state.values.retain(|(s, _), _| *s != id);
        state.schemas.insert(id, schema);
    }

    /// True if `schema.key` has no user value and therefore reads as its default.
    pub fn is_default(&self, schema: &str, key: &str) -> bool {
        !self.state().values.contains_key(&(schema.to_string(), key.to_string()))
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// `/` for the dumped path itself, otherwise the child path without surrounding slashes.
fn relative_group(base: &str, schema_path: &str) -> Option<String> {
    let rest = schema_path.strip_prefix(base)?;
    let rest = rest.trim_end_matches('/');
    Some(if rest.is_empty() { "/".to_string() } else { rest.to_string() })
}

fn absolute_path(base: &str, group: &str) -> String {
    if group == "/" {
        base.to_string()
    } else {
        format!("{}{}/", base, group.trim_matches('/'))
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, schema: &str, key: &str) -> Result<TypedValue, SettingsOverlayError> {
        let state = self.state();
        let def = state
            .definition(schema, key)
            .ok_or_else(|| SettingsOverlayError::read_unavailable(schema, key))?;
        Ok(state
            .values
            .get(&(schema.to_string(), key.to_string()))
            .unwrap_or(&def.default)
            .clone())
    }

    fn set(&self, schema: &str, key: &str, value: &TypedValue) -> bool {
        self.state().write(schema, key, value)
    }

    fn list_keys(&self, schema: &str) -> Vec<String> {
        self.state()
            .schemas
            .get(schema)
            .map(|s| s.keys.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn list_children(&self, schema: &str) -> Vec<String> {
        let state = self.state();
        let Some(parent) = state.schemas.get(schema) else {
            return Vec::new();
        };
        state
            .schemas
            .values()
            .filter(|child| {
                child.path.strip_prefix(parent.path.as_str()).is_some_and(|rest| {
                    let rest = rest.trim_end_matches('/');
                    !rest.is_empty() && !rest.contains('/')
                })
            })
            .map(|child| child.id.clone())
            .collect()
    }

    fn reset_to_default(&self, schema: &str, key: &str) {
        self.state().values.remove(&(schema.to_string(), key.to_string()));
    }

    fn dump_namespace(&self, path: &str) -> Result<String, SettingsOverlayError> {
        if !path.starts_with('/') || !path.ends_with('/') {
            return Err(SettingsOverlayError::DumpFailed {
                path: path.to_string(),
                reason: "Pfad muss mit '/' beginnen und enden".to_string(),
            });
        }
        let state = self.state();
        let mut schemas: Vec<&SchemaDefinition> = state.schemas.values().collect();
        schemas.sort_by(|a, b| a.path.cmp(&b.path));

        let mut key_file = KeyFile::new();
        for schema in schemas {
            let Some(group) = relative_group(path, &schema.path) else {
                continue;
            };
            for key in schema.keys.keys() {
                if let Some(value) = state.values.get(&(schema.id.clone(), key.clone())) {
                    key_file.set(&group, key, value.encode());
                }
            }
        }
        Ok(key_file.to_data())
    }

    fn load_namespace(&self, path: &str, blob: &str) -> bool {
        let key_file = match KeyFile::parse(blob) {
            Ok(key_file) => key_file,
            Err(err) => {
                debug!(path, error = %err, "Transportdaten nicht lesbar");
                return false;
            }
        };
        let mut state = self.state();
        for group in key_file.groups() {
            let target = absolute_path(path, &group.name);
            let Some(schema_id) = state.schema_at(&target).map(|s| s.id.clone()) else {
                debug!(path = %target, "Kein Schema unter diesem Pfad");
                return false;
            };
            for (key, text) in &group.entries {
                let applied = match TypedValue::decode(text) {
                    Ok(value) => state.write(&schema_id, key, &value),
                    Err(err) => {
                        debug!(schema = %schema_id, key = %key, error = %err, "Wert nicht lesbar");
                        false
                    }
                };
                // Entries applied so far stay applied.
                if !applied {
                    return false;
                }
            }
        }
        true
    }
}
