//! Field and settings dialog state

use card_model::{CardField, CardSettings};
use serde::{Deserialize, Serialize};

/// Whether the field dialog adds a new field or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogMode {
    #[default]
    Add,
    Edit,
}

/// State of the add/edit field dialog
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDialogState {
    pub is_open: bool,
    pub mode: DialogMode,
    /// Id of the field being edited (edit mode)
    pub field_id: Option<String>,
    /// Working copy shown in the dialog
    pub draft: Option<CardField>,
}

impl FieldDialogState {
    pub fn open_add(draft: CardField) -> Self {
        Self {
            is_open: true,
            mode: DialogMode::Add,
            field_id: None,
            draft: Some(draft),
        }
    }

    pub fn open_edit(field: CardField) -> Self {
        Self {
            is_open: true,
            mode: DialogMode::Edit,
            field_id: Some(field.id.clone()),
            draft: Some(field),
        }
    }

    /// Closing resets the dialog to add mode
    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            DialogMode::Add => "Add Field",
            DialogMode::Edit => "Edit Field",
        }
    }
}

/// State of the template settings dialog
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDialogState {
    pub is_open: bool,
    /// Working copy of the settings while the dialog is open
    pub draft: Option<CardSettings>,
}

impl SettingsDialogState {
    pub fn open(current: CardSettings) -> Self {
        Self {
            is_open: true,
            draft: Some(current),
        }
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }
}
