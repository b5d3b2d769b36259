use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The user's current answers, keyed by field id.
///
/// A key only exists once its field has been touched. An absent key means
/// "unset"; an empty string means "touched, then cleared".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(AHashMap<String, String>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw stored value, including empty strings.
    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.0.get(field_id).map(String::as_str)
    }

    /// The stored value only if it is non-empty.
    pub fn present(&self, field_id: &str) -> Option<&str> {
        self.get(field_id).filter(|value| !value.is_empty())
    }

    /// Stores a value and returns the previous one.
    pub fn set(&mut self, field_id: &str, value: &str) -> Option<String> {
        self.0.insert(field_id.to_string(), value.to_string())
    }

    pub fn remove(&mut self, field_id: &str) -> Option<String> {
        self.0.remove(field_id)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.0.retain(|key, value| keep(key, value));
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Load answers from a JSON object file (`{"field": "value", ...}`).
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(Path::new(path))?;
        let answers = serde_json::from_str(&content)?;
        Ok(answers)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Answers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<AHashMap<String, String>> for Answers {
    fn from(map: AHashMap<String, String>) -> Self {
        Self(map)
    }
}
