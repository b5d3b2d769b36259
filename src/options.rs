//! Normalizes static and fetched option lists into `{value, label}` pairs.
use crate::answers::Answers;
use crate::schema::{Choices, Field};
use ahash::AHashMap;
use serde::Serialize;

/// Label of the placeholder option that starts every resolved list.
pub const SENTINEL_LABEL: &str = "Select an option";

/// One entry of a select or radio input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    /// The neutral "unselected" placeholder.
    pub fn sentinel() -> Self {
        Self {
            value: String::new(),
            label: SENTINEL_LABEL.to_string(),
        }
    }

    pub fn from_choice(choice: &str) -> Self {
        Self {
            value: choice.to_string(),
            label: choice.to_string(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.value.is_empty() && self.label == SENTINEL_LABEL
    }
}

/// Options fetched for a field, keyed by the controlling value they were fetched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedOptions {
    pub key: String,
    pub options: Vec<String>,
}

/// Per-field cache of fetched dynamic options.
#[derive(Debug, Clone, Default)]
pub struct OptionCache {
    entries: AHashMap<String, CachedOptions>,
}

impl OptionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field_id: &str) -> Option<&CachedOptions> {
        self.entries.get(field_id)
    }

    /// The cached options for `field_id`, but only if they were fetched for `key`.
    pub fn current(&self, field_id: &str, key: &str) -> Option<&[String]> {
        self.entries
            .get(field_id)
            .filter(|entry| entry.key == key)
            .map(|entry| entry.options.as_slice())
    }

    /// Creates or overwrites the entry for `field_id`.
    pub fn store(&mut self, field_id: &str, key: &str, options: Vec<String>) {
        self.entries.insert(
            field_id.to_string(),
            CachedOptions {
                key: key.to_string(),
                options,
            },
        );
    }

    /// Drops the entry for `field_id`. Returns whether one existed.
    pub fn invalidate(&mut self, field_id: &str) -> bool {
        self.entries.remove(field_id).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves the option list for a field.
///
/// The result always starts with the sentinel. Static options map one to one.
/// Dynamic options come from the cache, and only while the cached entry was
/// fetched for the current controlling value. Never performs I/O.
pub fn resolve_options(field: &Field, answers: &Answers, cache: &OptionCache) -> Vec<SelectOption> {
    let mut resolved = vec![SelectOption::sentinel()];

    match field.choices() {
        Some(Choices::Static(options)) => {
            resolved.extend(options.iter().map(|option| SelectOption::from_choice(option)));
        }
        Some(Choices::Dynamic(dynamic)) => {
            let cached = answers
                .present(&dynamic.depends_on)
                .and_then(|key| cache.current(&field.id, key));
            if let Some(options) = cached {
                resolved.extend(options.iter().map(|option| SelectOption::from_choice(option)));
            }
        }
        None => {}
    }

    resolved
}
