//! Error types for card model operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CardModelError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Template already exists: {0}")]
    DuplicateTemplate(String),

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Field id already used in template: {0}")]
    DuplicateField(String),
}

pub type Result<T> = std::result::Result<T, CardModelError>;
