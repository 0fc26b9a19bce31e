//! Error types for editing operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Field id already used in template: {0}")]
    DuplicateField(String),

    #[error("Invalid grid size: {0}")]
    InvalidGridSize(f64),

    #[error("No field dialog is open")]
    DialogClosed,

    #[error("Card model error: {0}")]
    CardModel(#[from] card_model::CardModelError),

    #[error("Undo stack is empty")]
    UndoStackEmpty,

    #[error("Redo stack is empty")]
    RedoStackEmpty,
}

pub type Result<T> = std::result::Result<T, EditError>;
