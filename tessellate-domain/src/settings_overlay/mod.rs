//! Reversible overrides and export/import on top of a schema-partitioned settings store.
//!
//! [`OverrideEngine`] writes temporary values into foreign schemas and journals the
//! value it replaced, once per key. The journal lives in the extension's own
//! schema, so a new process picks up where the previous one stopped.
//! [`ExportEngine`] dumps and loads the extension's namespace without its
//! reserved keys and falls back to defaults when a load fails.

// Declare submodules
pub mod errors;
pub mod typed_value;
pub mod journal;
pub mod reserved_keys;
pub mod store_iface;
pub mod key_file;
pub mod memory_store;
pub mod override_engine;
pub mod export_engine;

#[cfg(test)]
mod test_fixtures;
#[cfg(test)]
mod override_engine_tests;

// Re-export key public types for easier access from outside this module.
pub use errors::SettingsOverlayError;
pub use typed_value::{TypedValue, TypedValueParseError};
pub use journal::OverrideJournal;
pub use reserved_keys::ReservedKeySet;
pub use store_iface::ConfigStore;
pub use key_file::{KeyFile, KeyFileGroup};
pub use memory_store::{KeyDefinition, MemoryConfigStore, SchemaDefinition};
pub use override_engine::{OverrideEngine, RestoreSummary};
pub use export_engine::ExportEngine;
