//! The transport blob format written by `dconf dump` and read by `dconf load`.
//!
//! ```text
//! [/]
//! enable-autotiling=true
//!
//! [keybindings]
//! focus-left=['<Super>a']
//! ```
//!
//! Group names are paths relative to the dumped namespace, `/` being the
//! namespace itself. Values are kept as raw text.

use super::errors::SettingsOverlayError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFileGroup {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl KeyFileGroup {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Ordered groups of `key=value` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFile {
    groups: Vec<KeyFileGroup>,
}

impl KeyFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(data: &str) -> Result<Self, SettingsOverlayError> {
        let mut key_file = KeyFile::new();
        for (index, raw_line) in data.lines().enumerate() {
            let line_no = index + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(rest) = line.strip_prefix('[') {
                let name = rest.strip_suffix(']').ok_or_else(|| SettingsOverlayError::KeyFileParse {
                    line: line_no,
                    reason: "Gruppenkopf ohne schließende Klammer".to_string(),
                })?;
                if name.trim().is_empty() {
                    return Err(SettingsOverlayError::KeyFileParse {
                        line: line_no,
                        reason: "leerer Gruppenname".to_string(),
                    });
                }
                key_file.group_mut(name.trim());
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| SettingsOverlayError::KeyFileParse {
                line: line_no,
                reason: format!("'=' fehlt in '{}'", line),
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(SettingsOverlayError::KeyFileParse { line: line_no, reason: "leerer Schlüssel".to_string() });
            }
            let group = key_file.groups.last_mut().ok_or_else(|| SettingsOverlayError::KeyFileParse {
                line: line_no,
                reason: format!("Schlüssel '{}' steht vor der ersten Gruppe", key),
            })?;
            set_entry(group, key, value.trim());
        }
        Ok(key_file)
    }

    pub fn groups(&self) -> &[KeyFileGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&KeyFileGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Sets `key` in `group`, creating the group at the end if needed.
    pub fn set(&mut self, group: &str, key: &str, value: impl Into<String>) {
        let value = value.into();
        set_entry(self.group_mut(group), key, &value);
    }

    /// Removes `key` from every group. Returns how many entries were removed.
    pub fn remove_key_everywhere(&mut self, key: &str) -> usize {
        let mut removed = 0;
        for group in &mut self.groups {
            let before = group.entries.len();
            group.entries.retain(|(k, _)| k != key);
            removed += before - group.entries.len();
        }
        removed
    }

    pub fn drop_empty_groups(&mut self) {
        self.groups.retain(|g| !g.entries.is_empty());
    }

    /// True if no group holds any entry.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.entries.is_empty())
    }

    pub fn to_data(&self) -> String {
        let mut out = String::new();
        for group in self.groups.iter().filter(|g| !g.entries.is_empty()) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push('[');
            out.push_str(&group.name);
            out.push_str("]\n");
            for (key, value) in &group.entries {
                out.push_str(key);
                out.push('=');
                out.push_str(value);
                out.push('\n');
            }
        }
        out
    }

    fn group_mut(&mut self, name: &str) -> &mut KeyFileGroup {
        let index = match self.groups.iter().position(|g| g.name == name) {
            Some(index) => index,
            None => {
                self.groups.push(KeyFileGroup { name: name.to_string(), entries: Vec::new() });
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }
}

fn set_entry(group: &mut KeyFileGroup, key: &str, value: &str) {
    match group.entries.iter_mut().find(|(k, _)| k == key) {
        Some(entry) => entry.1 = value.to_string(),
        None => group.entries.push((key.to_string(), value.to_string())),
    }
}
