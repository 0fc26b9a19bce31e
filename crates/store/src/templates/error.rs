//! Error types for template operations

use thiserror::Error;

/// Errors importing, loading or persisting templates
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Not JSON, or JSON that does not deserialize into a template
    #[error("Invalid template JSON format: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid template structure")]
    InvalidStructure,

    #[error("Missing required property: {0}")]
    MissingProperty(String),

    #[error("Invalid settings structure")]
    InvalidSettings,

    #[error("Missing required setting: {0}")]
    MissingSetting(String),

    #[error("Fields must be an array")]
    FieldsNotArray,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template file not found: {0}")]
    FileNotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] crate::StoreError),
}

/// Result type for template operations
pub type TemplateResult<T> = std::result::Result<T, TemplateError>;
