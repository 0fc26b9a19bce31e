//! Error types for application operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Template name is required")]
    NameRequired,

    #[error("No template selected")]
    NoSelection,

    #[error("Not editing a template")]
    NotEditing,

    #[error("The form is not shown while editing")]
    FormHidden,

    #[error("Card model error: {0}")]
    CardModel(#[from] card_model::CardModelError),

    #[error("Edit error: {0}")]
    Edit(#[from] edit_engine::EditError),

    #[error("Form error: {0}")]
    Form(#[from] form_engine::FormError),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("Template error: {0}")]
    Template(#[from] store::TemplateError),
}

pub type Result<T> = std::result::Result<T, AppError>;
