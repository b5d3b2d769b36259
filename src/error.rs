use thiserror::Error;

/// Errors that can occur while converting a wire schema into typed `Form`s.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Failed to parse form schema JSON: {0}")]
    JsonParseError(String),

    #[error("Could not read schema file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Field '{field_id}' in form '{form_id}' has an unknown type: '{type_name}'")]
    UnknownFieldType {
        form_id: String,
        field_id: String,
        type_name: String,
    },

    #[error("Field '{field_id}' in form '{form_id}' is malformed: {message}")]
    InvalidShape {
        form_id: String,
        field_id: String,
        message: String,
    },

    #[error("Field id '{field_id}' in form '{form_id}' is already used elsewhere in the schema")]
    DuplicateFieldId { form_id: String, field_id: String },
}

/// Errors reported by the external collaborators (schema source, option source, submit sink).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Request to '{url}' failed: {message}")]
    Request { url: String, message: String },

    #[error("Request to '{url}' returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("{operation} timed out after {after_ms} ms")]
    Timeout { operation: String, after_ms: u64 },

    #[error("Unsupported option lookup method '{0}'")]
    UnsupportedMethod(String),

    #[error("Schema in response is invalid: {0}")]
    Schema(#[from] SchemaError),
}

/// Errors raised by the form session state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No schema available: {0}")]
    SchemaUnavailable(#[source] SourceError),

    #[error("No schema has been loaded yet")]
    NotLoaded,

    #[error("Field '{0}' does not exist in the loaded schema")]
    UnknownField(String),

    #[error("Field '{0}' is a group and holds no value")]
    GroupField(String),

    #[error("A submission is already in flight")]
    SubmitInProgress,

    #[error("No submission is in flight")]
    NotSubmitting,
}

/// Errors that can occur while loading an `EngineConfig`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
