//! Error types for form operations

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("Form has {} invalid field(s)", errors.len())]
    Invalid { errors: BTreeMap<String, String> },
}

pub type Result<T> = std::result::Result<T, FormError>;
