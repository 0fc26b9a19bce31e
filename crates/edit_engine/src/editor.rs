//! The template layout editor

use crate::{
    CardGeometry, ClientPoint, ContainerRect, DialogMode, EditError, FieldDialogState,
    GridSettings, PixelRect, Result, SettingsDialogState, TemplateCommand, UndoManager, Zoom,
};
use card_model::{validate_template, CardField, CardSettings, CardTemplate, FieldType, Position};

/// Width of a newly created field in card pixels
pub const NEW_FIELD_WIDTH_PX: f64 = 100.0;

/// Height of a newly created field in card pixels
pub const NEW_FIELD_HEIGHT_PX: f64 = 40.0;

/// Smallest width a field can be resized to, in card pixels
pub const MIN_FIELD_WIDTH_PX: f64 = 40.0;

/// Smallest height a field can be resized to, in card pixels
pub const MIN_FIELD_HEIGHT_PX: f64 = 20.0;

/// Size drawn on the canvas for fields without stored dimensions
pub const FALLBACK_FIELD_SIZE_PX: (f64, f64) = (80.0, 40.0);

/// Create a blank field of the given type: fresh id, no name or label, not
/// required, 100x40 card pixels at the origin
pub fn create_new_field(field_type: FieldType, geometry: &CardGeometry) -> CardField {
    CardField::blank(field_type).with_position(Position::with_size(
        0.0,
        0.0,
        geometry.x_to_percent(NEW_FIELD_WIDTH_PX),
        geometry.y_to_percent(NEW_FIELD_HEIGHT_PX),
    ))
}

/// Editing session for one template.
///
/// The editor owns a working copy of the template. Every successful mutation
/// returns the updated template so the owner can write it back.
#[derive(Debug, Clone)]
pub struct LayoutEditor {
    template: CardTemplate,
    grid: GridSettings,
    zoom: Zoom,
    field_dialog: FieldDialogState,
    settings_dialog: SettingsDialogState,
    history: UndoManager,
}

impl LayoutEditor {
    pub fn new(template: CardTemplate) -> Self {
        Self {
            template,
            grid: GridSettings::default(),
            zoom: Zoom::default(),
            field_dialog: FieldDialogState::default(),
            settings_dialog: SettingsDialogState::default(),
            history: UndoManager::new(),
        }
    }

    pub fn with_grid(mut self, grid: GridSettings) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_zoom(mut self, zoom: Zoom) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_history(mut self, history: UndoManager) -> Self {
        self.history = history;
        self
    }

    pub fn template(&self) -> &CardTemplate {
        &self.template
    }

    pub fn into_template(self) -> CardTemplate {
        self.template
    }

    pub fn geometry(&self) -> CardGeometry {
        CardGeometry::from_settings(&self.template.settings)
    }

    /// Current validation errors of the working copy
    pub fn validation_errors(&self) -> Vec<String> {
        validate_template(&self.template)
    }

    // ========================================================================
    // Grid and zoom
    // ========================================================================

    pub fn grid(&self) -> &GridSettings {
        &self.grid
    }

    pub fn toggle_grid(&mut self) {
        self.grid.toggle();
    }

    pub fn toggle_snap(&mut self) {
        self.grid.toggle_snap();
    }

    pub fn set_grid_size(&mut self, size: f64) -> Result<()> {
        self.grid.set_size(size)
    }

    pub fn snap_to_grid(&self, value: f64) -> f64 {
        self.grid.snap_to_grid(value)
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn set_zoom(&mut self, percent: u32) {
        self.zoom.set(percent);
    }

    pub fn zoom_in(&mut self) {
        self.zoom.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.zoom.zoom_out();
    }

    // ========================================================================
    // Commands and history
    // ========================================================================

    /// Apply a command to the working copy, recording the previous state
    pub fn execute(&mut self, command: TemplateCommand) -> Result<&CardTemplate> {
        let mut updated = self.template.clone();
        command.apply(&mut updated)?;

        let previous = std::mem::replace(&mut self.template, updated);
        self.history
            .push(previous, command.display_name(), command.merge_key());
        Ok(&self.template)
    }

    pub fn undo(&mut self) -> Result<&CardTemplate> {
        let previous = self.history.undo(self.template.clone())?;
        self.template = previous;
        Ok(&self.template)
    }

    pub fn redo(&mut self) -> Result<&CardTemplate> {
        let next = self.history.redo(self.template.clone())?;
        self.template = next;
        Ok(&self.template)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &UndoManager {
        &self.history
    }

    // ========================================================================
    // Placement
    // ========================================================================

    /// Where a field is drawn on the canvas, in screen pixels
    pub fn field_screen_rect(&self, field_id: &str) -> Option<PixelRect> {
        let field = self.template.field(field_id)?;
        Some(
            self.geometry()
                .to_pixels(field.position(), FALLBACK_FIELD_SIZE_PX)
                .scaled(self.zoom.factor()),
        )
    }

    /// Drop a dragged field at a pointer position inside the drop container
    pub fn drop_field(
        &mut self,
        field_id: &str,
        point: ClientPoint,
        container: ContainerRect,
    ) -> Result<&CardTemplate> {
        let factor = self.zoom.factor();
        let x = self
            .snap_to_grid((point.client_x - container.left) / factor)
            .max(0.0);
        let y = self
            .snap_to_grid((point.client_y - container.top) / factor)
            .max(0.0);

        tracing::debug!(field_id, x, y, "Dropping field");
        self.set_pixel_position(field_id, x, y)
    }

    /// Move a field by a screen-pixel delta
    pub fn move_field_by(&mut self, field_id: &str, dx: f64, dy: f64) -> Result<&CardTemplate> {
        let geometry = self.geometry();
        let position = *self
            .template
            .field(field_id)
            .ok_or_else(|| EditError::FieldNotFound(field_id.to_string()))?
            .position();

        let factor = self.zoom.factor();
        let x = self
            .snap_to_grid(geometry.x_to_px(position.x) + dx / factor)
            .max(0.0);
        let y = self
            .snap_to_grid(geometry.y_to_px(position.y) + dy / factor)
            .max(0.0);

        tracing::debug!(field_id, x, y, "Moving field");
        self.set_pixel_position(field_id, x, y)
    }

    /// Resize a field to a card-pixel size, snapped and clamped to the minimum size
    pub fn resize_field(
        &mut self,
        field_id: &str,
        width_px: f64,
        height_px: f64,
    ) -> Result<&CardTemplate> {
        let width = self.snap_to_grid(width_px).max(MIN_FIELD_WIDTH_PX);
        let height = self.snap_to_grid(height_px).max(MIN_FIELD_HEIGHT_PX);
        let geometry = self.geometry();

        tracing::debug!(field_id, width, height, "Resizing field");
        self.execute(TemplateCommand::SetFieldSize {
            field_id: field_id.to_string(),
            width: geometry.x_to_percent(width),
            height: geometry.y_to_percent(height),
        })
    }

    fn set_pixel_position(&mut self, field_id: &str, x: f64, y: f64) -> Result<&CardTemplate> {
        let geometry = self.geometry();
        self.execute(TemplateCommand::SetFieldPosition {
            field_id: field_id.to_string(),
            x: geometry.x_to_percent(x),
            y: geometry.y_to_percent(y),
        })
    }

    // ========================================================================
    // Field dialog
    // ========================================================================

    pub fn field_dialog(&self) -> &FieldDialogState {
        &self.field_dialog
    }

    /// A blank field sized for this card
    pub fn create_new_field(&self, field_type: FieldType) -> CardField {
        create_new_field(field_type, &self.geometry())
    }

    pub fn open_add_field_dialog(&mut self, field_type: FieldType) {
        self.field_dialog = FieldDialogState::open_add(self.create_new_field(field_type));
    }

    pub fn open_edit_field_dialog(&mut self, field_id: &str) -> Result<()> {
        let field = self
            .template
            .field(field_id)
            .cloned()
            .ok_or_else(|| EditError::FieldNotFound(field_id.to_string()))?;
        self.field_dialog = FieldDialogState::open_edit(field);
        Ok(())
    }

    pub fn close_field_dialog(&mut self) {
        self.field_dialog.close();
    }

    /// Save the dialog's field: append in add mode, replace by id in edit mode.
    ///
    /// The dialog closes on success and stays open on error.
    pub fn save_field(&mut self, field: CardField) -> Result<&CardTemplate> {
        if !self.field_dialog.is_open {
            return Err(EditError::DialogClosed);
        }
        let command = match self.field_dialog.mode {
            DialogMode::Add => TemplateCommand::AddField { field },
            DialogMode::Edit => TemplateCommand::UpdateField { field },
        };
        self.execute(command)?;
        self.field_dialog.close();
        Ok(&self.template)
    }

    pub fn delete_field(&mut self, field_id: &str) -> Result<&CardTemplate> {
        self.execute(TemplateCommand::DeleteField {
            field_id: field_id.to_string(),
        })
    }

    // ========================================================================
    // Settings dialog
    // ========================================================================

    pub fn settings_dialog(&self) -> &SettingsDialogState {
        &self.settings_dialog
    }

    pub fn open_settings_dialog(&mut self) {
        self.settings_dialog = SettingsDialogState::open(self.template.settings.clone());
    }

    pub fn close_settings_dialog(&mut self) {
        self.settings_dialog.close();
    }

    /// Replace the template's settings and close the dialog
    pub fn save_settings(&mut self, settings: CardSettings) -> Result<&CardTemplate> {
        self.execute(TemplateCommand::UpdateSettings { settings })?;
        self.settings_dialog.close();
        Ok(&self.template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_model::{character_card_template, Unit};

    /// 400x200 px card with one 100x40 px field at the origin
    fn editor() -> LayoutEditor {
        let settings = CardSettings {
            width: 400.0,
            height: 200.0,
            unit: Unit::Px,
            ..Default::default()
        };
        let template = CardTemplate::new("T", "").with_settings(settings).with_field(
            CardField::new("a", FieldType::Text)
                .with_name("a")
                .with_position(Position::with_size(0.0, 0.0, 25.0, 20.0)),
        );
        LayoutEditor::new(template)
    }

    fn position(editor: &LayoutEditor, id: &str) -> Position {
        *editor.template().field(id).unwrap().position()
    }

    #[test]
    fn test_drop_snaps_and_converts_to_percent() {
        let mut editor = editor();
        let container = ContainerRect::new(50.0, 30.0, 400.0, 200.0);

        editor
            .drop_field("a", ClientPoint::new(50.0 + 95.0, 30.0 + 49.0), container)
            .unwrap();

        // 95 -> 100 px (25%), 49 -> 40 px (20%)
        let p = position(&editor, "a");
        assert_eq!((p.x, p.y), (25.0, 20.0));
    }

    #[test]
    fn test_drop_accounts_for_zoom_and_clamps() {
        let mut editor = editor();
        editor.set_zoom(200);
        let container = ContainerRect::new(0.0, 0.0, 800.0, 400.0);

        editor
            .drop_field("a", ClientPoint::new(400.0, -50.0), container)
            .unwrap();

        let p = position(&editor, "a");
        assert_eq!(p.x, 50.0);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_move_by_delta() {
        let mut editor = editor();
        editor.move_field_by("a", 41.0, 19.0).unwrap();
        let p = position(&editor, "a");
        assert_eq!((p.x, p.y), (10.0, 10.0));

        assert!(matches!(
            editor.move_field_by("missing", 1.0, 1.0),
            Err(EditError::FieldNotFound(_))
        ));
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let mut editor = editor();
        editor.resize_field("a", 10.0, 5.0).unwrap();
        let p = position(&editor, "a");
        assert_eq!(p.width, Some(10.0)); // 40 px of 400
        assert_eq!(p.height, Some(10.0)); // 20 px of 200

        editor.toggle_snap();
        editor.resize_field("a", 130.0, 50.0).unwrap();
        let p = position(&editor, "a");
        assert_eq!(p.width, Some(32.5));
        assert_eq!(p.height, Some(25.0));
    }

    #[test]
    fn test_add_field_through_dialog() {
        let mut editor = editor();
        editor.open_add_field_dialog(FieldType::Number);
        let draft = editor.field_dialog().draft.clone().unwrap();
        assert!(draft.id.starts_with("field-"));
        assert!(draft.name.is_empty() && draft.label.is_empty() && !draft.required);
        assert_eq!(*draft.position(), Position::with_size(0.0, 0.0, 25.0, 20.0));

        let field = draft.with_name("hp").with_label("HP");
        editor.save_field(field).unwrap();
        assert_eq!(editor.template().fields.len(), 2);
        assert!(!editor.field_dialog().is_open);
    }

    #[test]
    fn test_add_duplicate_id_keeps_dialog_open() {
        let mut editor = editor();
        editor.open_add_field_dialog(FieldType::Text);
        let result = editor.save_field(CardField::new("a", FieldType::Text));
        assert!(matches!(result, Err(EditError::DuplicateField(_))));
        assert!(editor.field_dialog().is_open);
        assert_eq!(editor.template().fields.len(), 1);
    }

    #[test]
    fn test_edit_field_through_dialog() {
        let mut editor = editor();
        editor.open_edit_field_dialog("a").unwrap();
        assert_eq!(editor.field_dialog().mode, DialogMode::Edit);

        let mut field = editor.field_dialog().draft.clone().unwrap();
        field.label = "Title".to_string();
        editor.save_field(field).unwrap();
        assert_eq!(editor.template().field("a").unwrap().label, "Title");
        assert_eq!(editor.field_dialog().mode, DialogMode::Add);
    }

    #[test]
    fn test_save_without_dialog() {
        let mut editor = editor();
        assert!(matches!(
            editor.save_field(CardField::new("b", FieldType::Text)),
            Err(EditError::DialogClosed)
        ));
    }

    #[test]
    fn test_settings_dialog() {
        let mut editor = editor();
        editor.open_settings_dialog();
        let mut settings = editor.settings_dialog().draft.clone().unwrap();
        settings.bleed_width = 5.0;
        editor.save_settings(settings).unwrap();
        assert_eq!(editor.template().settings.bleed_width, 5.0);
        assert!(!editor.settings_dialog().is_open);
    }

    #[test]
    fn test_undo_redo_delete() {
        let mut editor = editor();
        editor.delete_field("a").unwrap();
        assert!(editor.template().fields.is_empty());

        editor.undo().unwrap();
        assert_eq!(editor.template().fields.len(), 1);

        editor.redo().unwrap();
        assert!(editor.template().fields.is_empty());
        assert!(matches!(editor.redo(), Err(EditError::RedoStackEmpty)));
    }

    #[test]
    fn test_screen_rect_uses_zoom() {
        let mut editor = editor();
        editor.zoom_out();
        editor.zoom_out();
        let rect = editor.field_screen_rect("a").unwrap();
        assert_eq!(rect.width, 80.0);

        let sample = LayoutEditor::new(character_card_template());
        assert!(sample.validation_errors().is_empty());
    }
}
