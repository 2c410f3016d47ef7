//! Domain layer of the Tessellate settings stack.
//!
//! The [`settings_overlay`] module lets the extension temporarily override keys of
//! a shared settings store, restore the user's original values later (also after
//! a restart), and move its own settings tree between machines.

// Re-export core module
pub use tessellate_core as core;

pub mod settings_overlay;

pub use settings_overlay::{
    ConfigStore, ExportEngine, OverrideEngine, OverrideJournal, ReservedKeySet, RestoreSummary,
    SettingsOverlayError, TypedValue,
};
