//! Settings commands

use crate::state::AppState;
use store::{AppSettings, KeyValueStore};

/// Get current application settings
pub fn get_settings<S: KeyValueStore>(state: &AppState<S>) -> Result<AppSettings, String> {
    let app = state.app.lock().map_err(|e| e.to_string())?;
    Ok(app.settings().clone())
}

/// Update application settings; storage changes apply on the next start
pub fn update_settings<S: KeyValueStore>(
    settings: AppSettings,
    state: &AppState<S>,
) -> Result<AppSettings, String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    app.update_settings(settings).map_err(|e| e.to_string())?;
    tracing::info!("Settings updated");
    Ok(app.settings().clone())
}
