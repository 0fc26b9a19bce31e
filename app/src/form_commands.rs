//! Card form commands

use crate::state::{AppState, CardApp, FormSession, FormTab, SubmitOutcome};
use crate::AppError;
use card_model::FieldValue;
use form_engine::{render_form, FormControl};
use render_model::CardRender;
use serde::Serialize;
use store::KeyValueStore;

// =============================================================================
// DTOs
// =============================================================================

/// Card form view DTO
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormViewDto {
    pub template_id: String,
    pub tab: FormTab,
    /// One control per template field, in template order
    pub controls: Vec<FormControl>,
    pub valid: bool,
}

impl From<&FormSession> for FormViewDto {
    fn from(session: &FormSession) -> Self {
        Self {
            template_id: session.state.template().id.clone(),
            tab: session.tab,
            controls: render_form(&session.state),
            valid: session.state.is_valid(),
        }
    }
}

fn form_view<S: KeyValueStore>(app: &CardApp<S>) -> Result<FormViewDto, String> {
    if app.mode().is_editing() {
        return Err(AppError::FormHidden.to_string());
    }
    app.form()
        .map(FormViewDto::from)
        .ok_or_else(|| AppError::NoSelection.to_string())
}

// =============================================================================
// Commands
// =============================================================================

pub fn get_form<S: KeyValueStore>(state: &AppState<S>) -> Result<FormViewDto, String> {
    let app = state.app.lock().map_err(|e| e.to_string())?;
    form_view(&app)
}

/// Set a field's value
pub fn set_form_value<S: KeyValueStore>(
    name: String,
    value: FieldValue,
    state: &AppState<S>,
) -> Result<FormViewDto, String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    app.set_field_value(&name, value).map_err(|e| e.to_string())?;
    form_view(&app)
}

/// Set a field from typed text
pub fn set_form_input<S: KeyValueStore>(
    name: String,
    raw: String,
    state: &AppState<S>,
) -> Result<FormViewDto, String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    app.set_field_input(&name, &raw).map_err(|e| e.to_string())?;
    form_view(&app)
}

/// Mark a field touched so its error is shown
pub fn touch_form_field<S: KeyValueStore>(
    name: String,
    state: &AppState<S>,
) -> Result<FormViewDto, String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    app.touch_field(&name).map_err(|e| e.to_string())?;
    form_view(&app)
}

/// Switch between the form and preview tabs
pub fn set_form_tab<S: KeyValueStore>(
    tab: FormTab,
    state: &AppState<S>,
) -> Result<FormViewDto, String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    app.set_form_tab(tab).map_err(|e| e.to_string())?;
    form_view(&app)
}

pub fn reset_form<S: KeyValueStore>(state: &AppState<S>) -> Result<FormViewDto, String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    app.reset_form().map_err(|e| e.to_string())?;
    form_view(&app)
}

/// Preview of the card being filled in
pub fn get_card_preview<S: KeyValueStore>(state: &AppState<S>) -> Result<CardRender, String> {
    let app = state.app.lock().map_err(|e| e.to_string())?;
    app.preview().map_err(|e| e.to_string())
}

/// Submit the card form and export the card as a PDF
pub fn submit_card<S: KeyValueStore>(state: &AppState<S>) -> Result<SubmitOutcome, String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    let outcome = app.submit_card().map_err(|e| e.to_string())?;
    tracing::info!(
        "Card form submitted: accepted={}, pdf={:?}",
        outcome.accepted,
        outcome.pdf_path
    );
    Ok(outcome)
}
