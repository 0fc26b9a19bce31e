//! Layout editor commands
//!
//! Every command returns the full editor view so the canvas, toolbar and
//! dialogs can be redrawn from one response.

use crate::state::AppState;
use crate::AppError;
use card_model::{CardField, CardSettings, CardTemplate, FieldType};
use edit_engine::{
    ClientPoint, ContainerRect, FieldDialogState, GridSettings, LayoutEditor, PixelRect,
    SettingsDialogState,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use store::KeyValueStore;

// =============================================================================
// DTOs
// =============================================================================

/// Editor view DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorViewDto {
    pub template: CardTemplate,
    pub grid: GridSettings,
    /// Zoom in percent
    pub zoom: u32,
    pub can_undo: bool,
    pub can_redo: bool,
    pub field_dialog: FieldDialogState,
    pub field_dialog_title: String,
    pub settings_dialog: SettingsDialogState,
    /// Where each field is drawn, in screen pixels
    pub field_rects: BTreeMap<String, PixelRect>,
    pub validation_errors: Vec<String>,
}

impl From<&LayoutEditor> for EditorViewDto {
    fn from(editor: &LayoutEditor) -> Self {
        let template = editor.template();
        Self {
            template: template.clone(),
            grid: *editor.grid(),
            zoom: editor.zoom().percent(),
            can_undo: editor.can_undo(),
            can_redo: editor.can_redo(),
            field_dialog: editor.field_dialog().clone(),
            field_dialog_title: editor.field_dialog().title().to_string(),
            settings_dialog: editor.settings_dialog().clone(),
            field_rects: template
                .fields
                .iter()
                .filter_map(|f| Some((f.id.clone(), editor.field_screen_rect(&f.id)?)))
                .collect(),
            validation_errors: editor.validation_errors(),
        }
    }
}

fn run<S: KeyValueStore>(
    state: &AppState<S>,
    operation: impl FnOnce(&mut LayoutEditor) -> edit_engine::Result<()>,
) -> Result<EditorViewDto, String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    app.edit(operation).map_err(|e| e.to_string())?;
    app.editor()
        .map(EditorViewDto::from)
        .ok_or_else(|| AppError::NotEditing.to_string())
}

// =============================================================================
// Canvas
// =============================================================================

pub fn get_editor<S: KeyValueStore>(state: &AppState<S>) -> Result<EditorViewDto, String> {
    run(state, |_| Ok(()))
}

/// Drop a dragged field at a pointer position
pub fn drop_field<S: KeyValueStore>(
    field_id: String,
    point: ClientPoint,
    container: ContainerRect,
    state: &AppState<S>,
) -> Result<EditorViewDto, String> {
    run(state, |editor| {
        editor.drop_field(&field_id, point, container).map(|_| ())
    })
}

/// Move a field by a screen-pixel delta
pub fn move_field<S: KeyValueStore>(
    field_id: String,
    dx: f64,
    dy: f64,
    state: &AppState<S>,
) -> Result<EditorViewDto, String> {
    run(state, |editor| editor.move_field_by(&field_id, dx, dy).map(|_| ()))
}

/// Resize a field to a size in card pixels
pub fn resize_field<S: KeyValueStore>(
    field_id: String,
    width: f64,
    height: f64,
    state: &AppState<S>,
) -> Result<EditorViewDto, String> {
    run(state, |editor| {
        editor.resize_field(&field_id, width, height).map(|_| ())
    })
}

pub fn undo<S: KeyValueStore>(state: &AppState<S>) -> Result<EditorViewDto, String> {
    run(state, |editor| editor.undo().map(|_| ()))
}

pub fn redo<S: KeyValueStore>(state: &AppState<S>) -> Result<EditorViewDto, String> {
    run(state, |editor| editor.redo().map(|_| ()))
}

// =============================================================================
// Grid and zoom
// =============================================================================

pub fn toggle_grid<S: KeyValueStore>(state: &AppState<S>) -> Result<EditorViewDto, String> {
    run(state, |editor| {
        editor.toggle_grid();
        Ok(())
    })
}

pub fn toggle_snap<S: KeyValueStore>(state: &AppState<S>) -> Result<EditorViewDto, String> {
    run(state, |editor| {
        editor.toggle_snap();
        Ok(())
    })
}

pub fn set_grid_size<S: KeyValueStore>(
    size: f64,
    state: &AppState<S>,
) -> Result<EditorViewDto, String> {
    run(state, |editor| editor.set_grid_size(size))
}

pub fn set_zoom<S: KeyValueStore>(
    percent: u32,
    state: &AppState<S>,
) -> Result<EditorViewDto, String> {
    run(state, |editor| {
        editor.set_zoom(percent);
        Ok(())
    })
}

pub fn zoom_in<S: KeyValueStore>(state: &AppState<S>) -> Result<EditorViewDto, String> {
    run(state, |editor| {
        editor.zoom_in();
        Ok(())
    })
}

pub fn zoom_out<S: KeyValueStore>(state: &AppState<S>) -> Result<EditorViewDto, String> {
    run(state, |editor| {
        editor.zoom_out();
        Ok(())
    })
}

// =============================================================================
// Field dialog
// =============================================================================

/// Open the field dialog with a blank field of the given type
pub fn open_add_field_dialog<S: KeyValueStore>(
    field_type: FieldType,
    state: &AppState<S>,
) -> Result<EditorViewDto, String> {
    run(state, |editor| {
        editor.open_add_field_dialog(field_type);
        Ok(())
    })
}

pub fn open_edit_field_dialog<S: KeyValueStore>(
    field_id: String,
    state: &AppState<S>,
) -> Result<EditorViewDto, String> {
    run(state, |editor| editor.open_edit_field_dialog(&field_id))
}

pub fn close_field_dialog<S: KeyValueStore>(
    state: &AppState<S>,
) -> Result<EditorViewDto, String> {
    run(state, |editor| {
        editor.close_field_dialog();
        Ok(())
    })
}

/// Save the field dialog: adds in add mode, replaces in edit mode
pub fn save_field<S: KeyValueStore>(
    field: CardField,
    state: &AppState<S>,
) -> Result<EditorViewDto, String> {
    tracing::info!("Saving field: {}", field.id);
    run(state, |editor| editor.save_field(field).map(|_| ()))
}

pub fn delete_field<S: KeyValueStore>(
    field_id: String,
    state: &AppState<S>,
) -> Result<EditorViewDto, String> {
    tracing::info!("Deleting field: {}", field_id);
    run(state, |editor| editor.delete_field(&field_id).map(|_| ()))
}

// =============================================================================
// Settings dialog
// =============================================================================

pub fn open_settings_dialog<S: KeyValueStore>(
    state: &AppState<S>,
) -> Result<EditorViewDto, String> {
    run(state, |editor| {
        editor.open_settings_dialog();
        Ok(())
    })
}

pub fn close_settings_dialog<S: KeyValueStore>(
    state: &AppState<S>,
) -> Result<EditorViewDto, String> {
    run(state, |editor| {
        editor.close_settings_dialog();
        Ok(())
    })
}

/// Replace the card settings of the template being edited
pub fn save_template_settings<S: KeyValueStore>(
    settings: CardSettings,
    state: &AppState<S>,
) -> Result<EditorViewDto, String> {
    run(state, |editor| editor.save_settings(settings).map(|_| ()))
}
