//! Application state
//!
//! [`CardApp`] is the main window: a template list with a selection, a
//! surface that shows either the card form or the layout editor for the
//! selected template, the exported card store and the settings.

use crate::{AppError, Result};
use card_model::{CardData, CardSettings, CardTemplate, FieldValue, TemplateRegistry};
use edit_engine::{GridSettings, LayoutEditor, Zoom};
use form_engine::{FormError, FormState};
use render_model::{render_card, CardRender};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;
use store::{
    export_template, import_template, save_card_pdf_file_sync, AppSettings, CardManifestEntry,
    CardStorage, EditorDefaults, FileStore, KeyValueStore, MemoryStore, SettingsManager,
    StorageBackend, StorageSettings, TemplateCatalog,
};
use tracing::{error, info, warn};

// ============================================================================
// Surface
// ============================================================================

/// What the main surface shows for the selected template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceMode {
    /// Card form, right after a template is selected
    #[default]
    Viewing,
    /// Layout editor
    Editing,
    /// Card form, after leaving the editor
    Previewing,
}

impl SurfaceMode {
    /// Mode after pressing the toggle button
    pub fn toggled(self) -> Self {
        match self {
            SurfaceMode::Viewing | SurfaceMode::Previewing => SurfaceMode::Editing,
            SurfaceMode::Editing => SurfaceMode::Previewing,
        }
    }

    pub fn is_editing(self) -> bool {
        self == SurfaceMode::Editing
    }

    /// Caption of the toggle button
    pub fn toggle_label(self) -> &'static str {
        if self.is_editing() {
            "Preview Form"
        } else {
            "Edit Template"
        }
    }
}

/// Tab shown by the card form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormTab {
    #[default]
    Form,
    Preview,
}

/// The card form for the selected template
#[derive(Debug, Clone)]
pub struct FormSession {
    pub state: FormState,
    pub tab: FormTab,
}

impl FormSession {
    pub fn new(template: CardTemplate) -> Self {
        Self {
            state: FormState::new(template),
            tab: FormTab::default(),
        }
    }

    /// Preview of the values entered so far
    pub fn preview(&self) -> CardRender {
        render_card(self.state.template(), self.state.values())
    }
}

/// Result of submitting the card form
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    /// Whether the values passed validation
    pub accepted: bool,
    /// Per-field errors of a rejected submission
    pub errors: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<CardData>,
    /// Storage path of the exported PDF
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_path: Option<String>,
    /// Why the export failed; the submission is still accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_error: Option<String>,
}

impl SubmitOutcome {
    fn rejected(errors: BTreeMap<String, String>) -> Self {
        Self {
            accepted: false,
            errors,
            data: None,
            pdf_path: None,
            export_error: None,
        }
    }

    fn accepted(data: CardData, export: std::result::Result<String, String>) -> Self {
        let (pdf_path, export_error) = match export {
            Ok(path) => (Some(path), None),
            Err(e) => (None, Some(e)),
        };
        Self {
            accepted: true,
            errors: BTreeMap::new(),
            data: Some(data),
            pdf_path,
            export_error,
        }
    }
}

// ============================================================================
// New template dialog
// ============================================================================

/// Input of the "Create New Template" dialog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTemplateDialog {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to a 63 x 88 mm card with 3 mm bleed and a 2 mm safe margin
    #[serde(default)]
    pub settings: CardSettings,
}

impl NewTemplateDialog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_settings(mut self, settings: CardSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Whether the Create button is enabled
    pub fn can_create(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Build an empty template with a fresh id
    pub fn build(self) -> Result<CardTemplate> {
        if !self.can_create() {
            return Err(AppError::NameRequired);
        }
        Ok(CardTemplate::new(self.name, self.description).with_settings(self.settings))
    }
}

// ============================================================================
// Store
// ============================================================================

/// The store selected by the storage settings
#[derive(Debug)]
pub enum AppStore {
    Memory(MemoryStore),
    Files(FileStore),
}

impl AppStore {
    pub fn open(settings: &StorageSettings, app_data_dir: &Path) -> store::Result<Self> {
        match settings.backend {
            StorageBackend::Memory => Ok(AppStore::Memory(MemoryStore::new())),
            StorageBackend::Files => Ok(AppStore::Files(FileStore::open(
                settings.resolve_directory(app_data_dir),
            )?)),
        }
    }
}

impl KeyValueStore for AppStore {
    fn get(&self, key: &str) -> store::Result<Option<String>> {
        match self {
            AppStore::Memory(store) => store.get(key),
            AppStore::Files(store) => store.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> store::Result<()> {
        match self {
            AppStore::Memory(store) => store.set(key, value),
            AppStore::Files(store) => store.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) -> store::Result<bool> {
        match self {
            AppStore::Memory(store) => store.remove(key),
            AppStore::Files(store) => store.remove(key),
        }
    }

    fn keys(&self) -> store::Result<Vec<String>> {
        match self {
            AppStore::Memory(store) => store.keys(),
            AppStore::Files(store) => store.keys(),
        }
    }
}

// ============================================================================
// Application
// ============================================================================

fn grid_settings(defaults: &EditorDefaults) -> GridSettings {
    let mut grid = GridSettings {
        enabled: defaults.show_grid,
        snap: defaults.snap_to_grid,
        ..GridSettings::default()
    };
    if let Err(e) = grid.set_size(defaults.grid_size) {
        warn!("Ignoring default grid size: {}", e);
    }
    grid
}

pub struct CardApp<S: KeyValueStore> {
    templates: TemplateRegistry,
    selected: Option<String>,
    mode: SurfaceMode,
    /// Present while editing
    editor: Option<LayoutEditor>,
    /// Present while a template is selected and not being edited
    form: Option<FormSession>,
    store: S,
    settings: SettingsManager,
}

impl CardApp<AppStore> {
    /// Open the application data directory: settings, card store and template catalog
    pub fn open(app_data_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        use anyhow::Context;

        let app_data_dir = app_data_dir.as_ref();
        let mut settings = SettingsManager::new(app_data_dir);
        if let Err(e) = settings.load_sync() {
            warn!("Failed to load settings, using defaults: {}", e);
        }

        let storage = &settings.get().storage;
        let store = AppStore::open(storage, app_data_dir).context("Failed to open card store")?;
        info!(backend = ?storage.backend, "Opened card store");

        let app = Self::with_store(store, settings).context("Failed to load template catalog")?;
        info!(templates = app.templates().len(), "Loaded templates");
        Ok(app)
    }
}

impl<S: KeyValueStore> CardApp<S> {
    /// Create the application over a store, loading its template catalog
    pub fn with_store(mut store: S, settings: SettingsManager) -> Result<Self> {
        let templates = TemplateCatalog::new(&mut store).load_registry()?;
        Ok(Self {
            templates,
            selected: None,
            mode: SurfaceMode::default(),
            editor: None,
            form: None,
            store,
            settings,
        })
    }

    pub fn templates(&self) -> &[CardTemplate] {
        self.templates.list()
    }

    pub fn template(&self, template_id: &str) -> Option<&CardTemplate> {
        self.templates.get(template_id)
    }

    pub fn selected_template_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_template(&self) -> Option<&CardTemplate> {
        self.selected.as_deref().and_then(|id| self.templates.get(id))
    }

    pub fn mode(&self) -> SurfaceMode {
        self.mode
    }

    pub fn editor(&self) -> Option<&LayoutEditor> {
        self.editor.as_ref()
    }

    pub fn form(&self) -> Option<&FormSession> {
        self.form.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &AppSettings {
        self.settings.get()
    }

    /// Replace the settings and save them; editor defaults apply to the next session
    pub fn update_settings(&mut self, settings: AppSettings) -> Result<()> {
        self.settings.update_sync(settings)?;
        Ok(())
    }

    // ========================================================================
    // Template list
    // ========================================================================

    /// Select a template and show its card form
    pub fn select_template(&mut self, template_id: &str) -> Result<&CardTemplate> {
        let template = self.templates.require(template_id)?.clone();
        self.show_form(template, SurfaceMode::Viewing);
        self.selected = Some(template_id.to_string());
        info!(template = template_id, "Selected template");
        Ok(self.templates.require(template_id)?)
    }

    /// Create a template from the dialog, then select it in the editor
    pub fn add_template(&mut self, dialog: NewTemplateDialog) -> Result<&CardTemplate> {
        let template = dialog.build()?;
        let id = template.id.clone();
        self.templates.add(template.clone())?;
        self.save_templates()?;

        self.start_editing(template);
        self.selected = Some(id.clone());
        info!(template = %id, "Added template");
        Ok(self.templates.require(&id)?)
    }

    /// Remove a template; deleting the selected one clears the selection
    pub fn delete_template(&mut self, template_id: &str) -> Result<CardTemplate> {
        let removed = self.templates.remove(template_id)?;
        self.save_templates()?;

        if self.selected.as_deref() == Some(template_id) {
            self.selected = None;
            self.mode = SurfaceMode::default();
            self.editor = None;
            self.form = None;
        }
        info!(template = template_id, "Deleted template");
        Ok(removed)
    }

    /// Replace a template by id and select it, keeping the current surface
    pub fn update_template(&mut self, template: CardTemplate) -> Result<&CardTemplate> {
        let id = template.id.clone();
        self.templates.update(template.clone())?;
        self.save_templates()?;

        if self.mode.is_editing() {
            let (grid, zoom) = match &self.editor {
                Some(editor) => (*editor.grid(), editor.zoom()),
                None => {
                    let defaults = &self.settings.get().editor;
                    (grid_settings(defaults), Zoom::new(defaults.zoom))
                }
            };
            self.editor = Some(LayoutEditor::new(template).with_grid(grid).with_zoom(zoom));
        } else {
            self.show_form(template, self.mode);
        }
        self.selected = Some(id.clone());
        Ok(self.templates.require(&id)?)
    }

    /// Validation errors of a template
    pub fn validate_template(&self, template_id: &str) -> Result<Vec<String>> {
        Ok(self.templates.require(template_id)?.validate())
    }

    fn save_templates(&mut self) -> Result<()> {
        TemplateCatalog::new(&mut self.store).save(self.templates.list())?;
        Ok(())
    }

    // ========================================================================
    // Interchange
    // ========================================================================

    pub fn export_template_json(&self, template_id: &str) -> Result<String> {
        Ok(export_template(self.templates.require(template_id)?)?)
    }

    /// Import a template and select it.
    ///
    /// A template whose id is already listed replaces the listed one.
    pub fn import_template_json(&mut self, json: &str) -> Result<&CardTemplate> {
        let template = import_template(json)?;
        self.install_template(template)
    }

    /// Add or replace a template and select it
    pub fn install_template(&mut self, template: CardTemplate) -> Result<&CardTemplate> {
        if self.templates.contains(&template.id) {
            return self.update_template(template);
        }
        let id = template.id.clone();
        self.templates.add(template)?;
        self.save_templates()?;
        self.select_template(&id)
    }

    // ========================================================================
    // Surface
    // ========================================================================

    /// Switch between the layout editor and the card form
    pub fn toggle_mode(&mut self) -> Result<SurfaceMode> {
        let template = self
            .selected_template()
            .cloned()
            .ok_or(AppError::NoSelection)?;
        match self.mode.toggled() {
            SurfaceMode::Editing => self.start_editing(template),
            mode => self.show_form(template, mode),
        }
        info!(mode = ?self.mode, "Toggled surface");
        Ok(self.mode)
    }

    fn start_editing(&mut self, template: CardTemplate) {
        let defaults = &self.settings.get().editor;
        let editor = LayoutEditor::new(template)
            .with_grid(grid_settings(defaults))
            .with_zoom(Zoom::new(defaults.zoom));
        self.editor = Some(editor);
        self.form = None;
        self.mode = SurfaceMode::Editing;
    }

    fn show_form(&mut self, template: CardTemplate, mode: SurfaceMode) {
        self.editor = None;
        self.form = Some(FormSession::new(template));
        self.mode = mode;
    }

    // ========================================================================
    // Editor
    // ========================================================================

    /// Run a layout editor operation, then write the edited template back to
    /// the template list
    pub fn edit<T>(
        &mut self,
        operation: impl FnOnce(&mut LayoutEditor) -> edit_engine::Result<T>,
    ) -> Result<T> {
        let editor = self.editor.as_mut().ok_or(AppError::NotEditing)?;
        let output = operation(editor)?;

        let edited = editor.template();
        if self.templates.get(&edited.id) != Some(edited) {
            let edited = edited.clone();
            self.templates.update(edited)?;
            self.save_templates()?;
        }
        Ok(output)
    }

    // ========================================================================
    // Form
    // ========================================================================

    fn form_mut(&mut self) -> Result<&mut FormSession> {
        if self.mode.is_editing() {
            return Err(AppError::FormHidden);
        }
        self.form.as_mut().ok_or(AppError::NoSelection)
    }

    pub fn set_field_value(&mut self, name: &str, value: FieldValue) -> Result<()> {
        self.form_mut()?.state.set_value(name, value)?;
        Ok(())
    }

    /// Set a field from raw input text, as typed
    pub fn set_field_input(&mut self, name: &str, raw: &str) -> Result<()> {
        self.form_mut()?.state.set_input(name, raw)?;
        Ok(())
    }

    /// Mark a field touched (on blur) so its error is shown
    pub fn touch_field(&mut self, name: &str) -> Result<()> {
        self.form_mut()?.state.touch(name);
        Ok(())
    }

    pub fn set_form_tab(&mut self, tab: FormTab) -> Result<()> {
        self.form_mut()?.tab = tab;
        Ok(())
    }

    pub fn reset_form(&mut self) -> Result<()> {
        self.form_mut()?.state.reset();
        Ok(())
    }

    /// Preview of the card being filled in
    pub fn preview(&self) -> Result<CardRender> {
        if self.mode.is_editing() {
            return Err(AppError::FormHidden);
        }
        self.form
            .as_ref()
            .map(FormSession::preview)
            .ok_or(AppError::NoSelection)
    }

    /// Validate the card form and export the card as a PDF.
    ///
    /// An export failure is logged and reported in the outcome; the
    /// submission itself still counts as accepted.
    pub fn submit_card(&mut self) -> Result<SubmitOutcome> {
        let session = self.form_mut()?;
        let data = match session.state.submit(CardData::clone) {
            Ok(data) => data,
            Err(FormError::Invalid { errors }) => {
                info!(errors = errors.len(), "Card form rejected");
                return Ok(SubmitOutcome::rejected(errors));
            }
            Err(e) => return Err(e.into()),
        };
        let template = session.state.template().clone();

        let render = render_card(&template, &data);
        let export = self
            .card_storage()
            .save_card_as_pdf(&template, &data, &render)
            .map_err(|e| {
                error!(template = %template.id, "Failed to export card: {}", e);
                e.to_string()
            });
        Ok(SubmitOutcome::accepted(data, export))
    }

    // ========================================================================
    // Exported cards
    // ========================================================================

    fn card_storage(&mut self) -> CardStorage<&mut S> {
        let options = self.settings.get().export.to_pdf_options();
        CardStorage::new(&mut self.store).with_options(options)
    }

    /// Exported cards, oldest first
    pub fn cards(&mut self) -> Result<Vec<CardManifestEntry>> {
        Ok(self.card_storage().get_card_manifest()?)
    }

    pub fn delete_card(&mut self, card_id: &str) -> Result<bool> {
        Ok(self.card_storage().delete_card(card_id)?)
    }

    /// Stored PDF data URI
    pub fn card_pdf(&mut self, pdf_path: &str) -> Result<Option<String>> {
        Ok(self.card_storage().get_card_pdf(pdf_path)?)
    }

    /// Write a stored PDF to a file
    pub fn save_card_pdf_to(&mut self, pdf_path: &str, destination: &Path) -> Result<()> {
        save_card_pdf_file_sync(&self.card_storage(), pdf_path, destination)?;
        info!(path = pdf_path, destination = ?destination, "Saved card PDF file");
        Ok(())
    }
}

// ============================================================================
// Shared state
// ============================================================================

/// Application state shared with the command layer
pub struct AppState<S: KeyValueStore = AppStore> {
    pub app: Mutex<CardApp<S>>,
}

impl<S: KeyValueStore> AppState<S> {
    pub fn new(app: CardApp<S>) -> Self {
        Self {
            app: Mutex::new(app),
        }
    }
}

impl AppState {
    /// Open the application data directory
    pub fn open(app_data_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        Ok(Self::new(CardApp::open(app_data_dir)?))
    }
}
