use std::collections::HashMap;

/// Parsed `key=value` localization file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Localization {
    entries: HashMap<String, String>,
}

impl Localization {
    /// Parse line-oriented text.
    ///
    /// Blank lines and lines starting with `//` or `#` are skipped. The first
    /// `=` splits key from value; both sides are trimmed. Lines without `=`
    /// are ignored. A repeated key keeps the later value.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                log::trace!("Skipping localization line without '=': {line}");
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            entries.insert(key.to_string(), value.trim().to_string());
        }
        Self { entries }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Lookup for `"<template>.displayName.<data_name>"`
    #[must_use]
    pub fn display_name(&self, template: &str, data_name: &str) -> Option<&str> {
        self.get(&format!("{template}.displayName.{data_name}"))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge another file's entries; existing keys are overwritten.
    pub fn extend(&mut self, other: &Self) {
        self.entries
            .extend(other.entries.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}
