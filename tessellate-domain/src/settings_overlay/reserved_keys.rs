use std::collections::BTreeSet;

use tessellate_core::config::OverlayConfig;

/// Keys holding the overlay's own state: never exported, never imported, never reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedKeySet {
    journal_key: String,
    keys: BTreeSet<String>,
}

impl ReservedKeySet {
    pub fn new<I, S>(journal_key: impl Into<String>, others: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let journal_key = journal_key.into();
        let mut keys: BTreeSet<String> = others.into_iter().map(Into::into).collect();
        keys.insert(journal_key.clone());
        Self { journal_key, keys }
    }

    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::new(config.journal_key.clone(), [config.version_key.clone(), config.layouts_key.clone()])
    }

    /// The key the override journal is persisted under.
    pub fn journal_key(&self) -> &str {
        &self.journal_key
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}
