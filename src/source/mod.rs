//! Contracts for the collaborators the engine talks to: where the schema comes
//! from, where dependent option lists come from, and where answers go.
use crate::answers::Answers;
use crate::error::SourceError;
use crate::schema::Form;
use crate::tracker::FetchRequest;
use async_trait::async_trait;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpBackend;

/// Supplies the form schema. Called once per session.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    async fn fetch_forms(&self) -> Result<Vec<Form>, SourceError>;
}

/// Supplies the option list of a dependent field for one controlling value.
#[async_trait]
pub trait OptionSource: Send + Sync {
    async fn fetch_options(&self, request: &FetchRequest) -> Result<Vec<String>, SourceError>;
}

/// Accepts a completed set of answers.
#[async_trait]
pub trait SubmitSink: Send + Sync {
    async fn submit(&self, answers: &Answers) -> Result<(), SourceError>;
}

/// A schema that is already in memory.
#[async_trait]
impl SchemaSource for Vec<Form> {
    async fn fetch_forms(&self) -> Result<Vec<Form>, SourceError> {
        Ok(self.clone())
    }
}

/// Pulls the option list out of a lookup response.
///
/// A bare array is taken as is. For an object, `key` is tried first, then the
/// first member that is an array of strings. Non-string array items make the
/// response unusable.
pub fn extract_option_list(body: &serde_json::Value, key: &str) -> Option<Vec<String>> {
    let strings = |value: &serde_json::Value| -> Option<Vec<String>> {
        value
            .as_array()?
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect()
    };

    match body {
        serde_json::Value::Array(_) => strings(body),
        serde_json::Value::Object(map) => map
            .get(key)
            .and_then(strings)
            .or_else(|| map.values().find_map(strings)),
        _ => None,
    }
}
