//! Exported card commands

use crate::state::AppState;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use store::{CardManifestEntry, KeyValueStore};

// =============================================================================
// DTOs
// =============================================================================

/// Exported card summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardEntryDto {
    pub id: String,
    pub template_id: String,
    pub name: Option<String>,
    pub pdf_path: String,
    pub created_at: String,
}

impl From<CardManifestEntry> for CardEntryDto {
    fn from(entry: CardManifestEntry) -> Self {
        Self {
            id: entry.id,
            template_id: entry.template_id,
            name: entry.name,
            pdf_path: entry.pdf_path,
            created_at: entry.created_at,
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

/// List exported cards, oldest first
pub fn list_cards<S: KeyValueStore>(state: &AppState<S>) -> Result<Vec<CardEntryDto>, String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    let cards = app.cards().map_err(|e| e.to_string())?;
    Ok(cards.into_iter().map(CardEntryDto::from).collect())
}

/// Delete an exported card and its PDF; returns whether it existed
pub fn delete_card<S: KeyValueStore>(
    card_id: String,
    state: &AppState<S>,
) -> Result<bool, String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    app.delete_card(&card_id).map_err(|e| e.to_string())
}

/// Stored PDF as a data URI
pub fn get_card_pdf<S: KeyValueStore>(
    pdf_path: String,
    state: &AppState<S>,
) -> Result<String, String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    app.card_pdf(&pdf_path)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Card PDF not found: {}", pdf_path))
}

/// Write a stored PDF to a file
pub fn save_card_pdf<S: KeyValueStore>(
    pdf_path: String,
    destination: PathBuf,
    state: &AppState<S>,
) -> Result<(), String> {
    let mut app = state.app.lock().map_err(|e| e.to_string())?;
    app.save_card_pdf_to(&pdf_path, &destination)
        .map_err(|e| e.to_string())
}
