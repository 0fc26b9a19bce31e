//! Commands for the template list, the editing surface and template interchange

use crate::state::{AppState, CardApp, NewTemplateDialog, SurfaceMode};
use card_model::CardTemplate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use store::{load_template_file, save_template_file, template_file_path, KeyValueStore};

// =============================================================================
// DTOs
// =============================================================================

/// Template summary for the template menu
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummaryDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub field_count: usize,
    /// Whether this is the selected template
    pub selected: bool,
}

impl TemplateSummaryDto {
    fn new(template: &CardTemplate, selected_id: Option<&str>) -> Self {
        Self {
            id: template.id.clone(),
            name: template.name.clone(),
            description: template.description.clone(),
            field_count: template.fields.len(),
            selected: selected_id == Some(template.id.as_str()),
        }
    }
}

/// Selection and surface state of the main window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceDto {
    pub selected_template_id: Option<String>,
    pub mode: SurfaceMode,
    /// Caption of the edit/preview toggle button
    pub toggle_label: String,
}

impl<S: KeyValueStore> From<&CardApp<S>> for SurfaceDto {
    fn from(app: &CardApp<S>) -> Self {
        Self {
            selected_template_id: app.selected_template_id().map(str::to_string),
            mode: app.mode(),
            toggle_label: app.mode().toggle_label().to_string(),
        }
    }
}

// =============================================================================
// Template list
// =============================================================================

/// List all templates
pub fn list_templates<S: KeyValueStore>(
    state: &AppState<S>,
) -> Result<Vec<TemplateSummaryDto>, String> {
    let app = state.app.lock().map_err(|e| e.to_string())?;
    let selected = app.selected_template_id();
    Ok(app
        .templates()
        .iter()
        .map(|t| TemplateSummaryDto::new(t, selected))
        .collect())
}

pub fn get_template<S: KeyValueStore>(
    template_id: String,
    state: &AppState<S>,
) -> Result<CardTemplate, String> {
    let app = state.app.lock().map_err(|e| e.to_string())?;
    app.template(&template_id)
        .cloned()
        .ok_or_else(|| format!("Template not found: {}", template_id))
}

/// Select a template and show its card form
pub fn select_template<S: KeyValueStore>(
    template_id: String,
    state: &AppState<S>,
) -> Result<SurfaceDto, String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    app.select_template(&template_id).map_err(|e| e.to_string())?;
    Ok(SurfaceDto::from(&*app))
}

/// Create a template from the new template dialog and open it in the editor
pub fn add_template<S: KeyValueStore>(
    dialog: NewTemplateDialog,
    state: &AppState<S>,
) -> Result<CardTemplate, String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    let template = app.add_template(dialog).map_err(|e| e.to_string())?;
    tracing::info!("Created template: {}", template.name);
    Ok(template.clone())
}

pub fn delete_template<S: KeyValueStore>(
    template_id: String,
    state: &AppState<S>,
) -> Result<SurfaceDto, String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    app.delete_template(&template_id).map_err(|e| e.to_string())?;
    Ok(SurfaceDto::from(&*app))
}

/// Replace a template and select it
pub fn update_template<S: KeyValueStore>(
    template: CardTemplate,
    state: &AppState<S>,
) -> Result<CardTemplate, String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    Ok(app.update_template(template).map_err(|e| e.to_string())?.clone())
}

/// Validation errors of a template; empty when it is valid
pub fn validate_template<S: KeyValueStore>(
    template_id: String,
    state: &AppState<S>,
) -> Result<Vec<String>, String> {
    let app = state.app.lock().map_err(|e| e.to_string())?;
    app.validate_template(&template_id).map_err(|e| e.to_string())
}

// =============================================================================
// Surface
// =============================================================================

pub fn get_surface<S: KeyValueStore>(state: &AppState<S>) -> Result<SurfaceDto, String> {
    let app = state.app.lock().map_err(|e| e.to_string())?;
    Ok(SurfaceDto::from(&*app))
}

/// Switch the selected template between the layout editor and the card form
pub fn toggle_surface<S: KeyValueStore>(state: &AppState<S>) -> Result<SurfaceDto, String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    app.toggle_mode().map_err(|e| e.to_string())?;
    Ok(SurfaceDto::from(&*app))
}

// =============================================================================
// Interchange
// =============================================================================

/// Export a template as indented JSON
pub fn export_template_json<S: KeyValueStore>(
    template_id: String,
    state: &AppState<S>,
) -> Result<String, String> {
    let app = state.app.lock().map_err(|e| e.to_string())?;
    app.export_template_json(&template_id)
        .map_err(|e| e.to_string())
}

/// Import a template from JSON and select it
pub fn import_template_json<S: KeyValueStore>(
    json: String,
    state: &AppState<S>,
) -> Result<CardTemplate, String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    let template = app.import_template_json(&json).map_err(|e| e.to_string())?;
    tracing::info!("Imported template: {}", template.name);
    Ok(template.clone())
}

/// Save a template as a `.cardtpl.json` file in a directory; returns the file path
pub async fn save_template_to_file<S: KeyValueStore>(
    template_id: String,
    directory: PathBuf,
    state: &AppState<S>,
) -> Result<String, String> {
    let template = {
        let app = state.app.lock().map_err(|e| e.to_string())?;
        app.template(&template_id)
            .cloned()
            .ok_or_else(|| format!("Template not found: {}", template_id))?
    };
    let path = template_file_path(&directory, &template);
    save_template_file(&template, &path)
        .await
        .map_err(|e| e.to_string())?;
    tracing::info!("Saved template file: {:?}", path);
    Ok(path.to_string_lossy().into_owned())
}

/// Load a template file and add it to the list
pub async fn load_template_from_file<S: KeyValueStore>(
    path: PathBuf,
    state: &AppState<S>,
) -> Result<CardTemplate, String> {
    let template = load_template_file(&path).await.map_err(|e| e.to_string())?;
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    Ok(app
        .install_template(template)
        .map_err(|e| e.to_string())?
        .clone())
}
