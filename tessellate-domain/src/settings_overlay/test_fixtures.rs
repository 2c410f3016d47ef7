//! Shared store setup for the settings overlay tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tessellate_core::config::OverlayConfig;

use crate::settings_overlay::errors::SettingsOverlayError;
use crate::settings_overlay::memory_store::{MemoryConfigStore, SchemaDefinition};
use crate::settings_overlay::store_iface::ConfigStore;
use crate::settings_overlay::typed_value::TypedValue;

pub const EXT_SCHEMA: &str = "org.gnome.shell.extensions.tilingshell";
pub const EXT_PATH: &str = "/org/gnome/shell/extensions/tilingshell/";
pub const JOURNAL_KEY: &str = "overridden-settings";
pub const MUTTER: &str = "org.gnome.mutter";
pub const MUTTER_KEYBINDINGS: &str = "org.gnome.mutter.keybindings";

pub fn extension_schema() -> SchemaDefinition {
    SchemaDefinition::new(EXT_SCHEMA, EXT_PATH)
        .with_key(JOURNAL_KEY, "{}")
        .with_key("last-version-name-installed", "0")
        .with_key("layouts-json", "[]")
        .with_key("enable-autotiling", false)
        .with_key("enable-tiling-system", true)
        .with_key("enable-snap-assist", true)
        .with_key("enable-move-keybindings", false)
        .with_key("inner-gaps", TypedValue::UInt32(8))
        .with_key("outer-gaps", TypedValue::UInt32(2))
        .with_key("restore-window-original-size", true)
        .with_key("excluded-applications", Vec::<String>::new())
}

pub fn extension_keybindings_schema() -> SchemaDefinition {
    SchemaDefinition::new(format!("{}.keybindings", EXT_SCHEMA), format!("{}keybindings/", EXT_PATH))
        .with_key("focus-window-left", vec!["<Super>a".to_string()])
}

/// A fresh store with the extension schemas plus the foreign schemas the engine overrides.
pub fn memory_store() -> Arc<MemoryConfigStore> {
    let store = MemoryConfigStore::new()
        .with_schema(extension_schema())
        .with_schema(extension_keybindings_schema())
        .with_schema(
            SchemaDefinition::new(MUTTER, "/org/gnome/mutter/")
                .with_key("edge-tiling", true)
                .with_read_only_key("experimental-features", Vec::<String>::new()),
        )
        .with_schema(
            SchemaDefinition::new(MUTTER_KEYBINDINGS, "/org/gnome/mutter/keybindings/")
                .with_key("toggle-tiled-left", vec!["<Super>Left".to_string()])
                .with_key("toggle-tiled-right", vec!["<Super>Right".to_string()]),
        )
        .with_schema(SchemaDefinition::new("example", "/example/").with_key("enabled", false));
    Arc::new(store)
}

pub fn overlay_config() -> OverlayConfig {
    OverlayConfig::default()
}

/// Wraps a [`MemoryConfigStore`] and injects failures.
#[derive(Debug)]
pub struct FlakyStore {
    pub inner: Arc<MemoryConfigStore>,
    rejected: Mutex<HashSet<(String, String)>>,
    fail_loads: AtomicBool,
    fail_dumps: AtomicBool,
    journal_writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: Arc<MemoryConfigStore>) -> Self {
        Self {
            inner,
            rejected: Mutex::new(HashSet::new()),
            fail_loads: AtomicBool::new(false),
            fail_dumps: AtomicBool::new(false),
            journal_writes: AtomicUsize::new(0),
        }
    }

    pub fn reject_writes(&self, schema: &str, key: &str) {
        self.rejected.lock().unwrap().insert((schema.to_string(), key.to_string()));
    }

    pub fn accept_writes(&self, schema: &str, key: &str) {
        self.rejected.lock().unwrap().remove(&(schema.to_string(), key.to_string()));
    }

    /// Loads still apply to the inner store but are reported as failed.
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_dumps(&self, fail: bool) {
        self.fail_dumps.store(fail, Ordering::SeqCst);
    }

    pub fn journal_writes(&self) -> usize {
        self.journal_writes.load(Ordering::SeqCst)
    }
}

impl ConfigStore for FlakyStore {
    fn get(&self, schema: &str, key: &str) -> Result<TypedValue, SettingsOverlayError> {
        self.inner.get(schema, key)
    }

    fn set(&self, schema: &str, key: &str, value: &TypedValue) -> bool {
        if self.rejected.lock().unwrap().contains(&(schema.to_string(), key.to_string())) {
            return false;
        }
        if schema == EXT_SCHEMA && key == JOURNAL_KEY {
            self.journal_writes.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.set(schema, key, value)
    }

    fn list_keys(&self, schema: &str) -> Vec<String> {
        self.inner.list_keys(schema)
    }

    fn list_children(&self, schema: &str) -> Vec<String> {
        self.inner.list_children(schema)
    }

    fn reset_to_default(&self, schema: &str, key: &str) {
        self.inner.reset_to_default(schema, key)
    }

    fn dump_namespace(&self, path: &str) -> Result<String, SettingsOverlayError> {
        if self.fail_dumps.load(Ordering::SeqCst) {
            return Err(SettingsOverlayError::DumpFailed { path: path.to_string(), reason: "injected".to_string() });
        }
        self.inner.dump_namespace(path)
    }

    fn load_namespace(&self, path: &str, blob: &str) -> bool {
        let loaded = self.inner.load_namespace(path, blob);
        loaded && !self.fail_loads.load(Ordering::SeqCst)
    }
}

/// A store whose dump always returns the given text.
#[derive(Debug)]
pub struct CannedDumpStore {
    pub inner: Arc<MemoryConfigStore>,
    pub dump: String,
}

impl ConfigStore for CannedDumpStore {
    fn get(&self, schema: &str, key: &str) -> Result<TypedValue, SettingsOverlayError> {
        self.inner.get(schema, key)
    }

    fn set(&self, schema: &str, key: &str, value: &TypedValue) -> bool {
        self.inner.set(schema, key, value)
    }

    fn list_keys(&self, schema: &str) -> Vec<String> {
        self.inner.list_keys(schema)
    }

    fn list_children(&self, schema: &str) -> Vec<String> {
        self.inner.list_children(schema)
    }

    fn reset_to_default(&self, schema: &str, key: &str) {
        self.inner.reset_to_default(schema, key)
    }

    fn dump_namespace(&self, _path: &str) -> Result<String, SettingsOverlayError> {
        Ok(self.dump.clone())
    }

    fn load_namespace(&self, path: &str, blob: &str) -> bool {
        self.inner.load_namespace(path, blob)
    }
}
