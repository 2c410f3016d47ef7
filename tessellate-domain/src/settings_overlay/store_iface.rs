use super::errors::SettingsOverlayError;
use super::typed_value::TypedValue;

/// A schema-partitioned key/value settings store owned by someone else.
///
/// Calls are blocking and must not be re-entered: an implementation is never
/// called from inside one of its own pending operations. The store reports
/// write and load failures only through the returned flag.
pub trait ConfigStore: Send + Sync {
    /// Current value of `schema.key`.
    ///
    /// # Errors
    /// [`SettingsOverlayError::StoreReadUnavailable`] if the schema or key does not exist.
    fn get(&self, schema: &str, key: &str) -> Result<TypedValue, SettingsOverlayError>;

    /// Writes `value`; `false` if the key is read-only, unknown, or of another type.
    fn set(&self, schema: &str, key: &str, value: &TypedValue) -> bool;

    /// Keys defined by `schema`, empty for an unknown schema.
    fn list_keys(&self, schema: &str) -> Vec<String>;

    /// Ids of the schemas mounted directly below `schema`'s path, empty for an
    /// unknown schema.
    fn list_children(&self, schema: &str) -> Vec<String>;

    /// Drops any user value so the key reads as its schema default again.
    fn reset_to_default(&self, schema: &str, key: &str);

    /// Dumps every user-set key below the dconf path `path` as a key file.
    ///
    /// # Errors
    /// [`SettingsOverlayError::DumpFailed`] if the dump could not be produced.
    fn dump_namespace(&self, path: &str) -> Result<String, SettingsOverlayError>;

    /// Loads a key file below `path`. `false` means the load did not complete and
    /// may have been applied partially.
    fn load_namespace(&self, path: &str, blob: &str) -> bool;
}
