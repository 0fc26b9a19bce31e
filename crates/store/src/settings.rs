//! Application settings management
//!
//! Settings are kept in `settings.json` in the application data directory.

use crate::pdf::{PdfExportOptions, CARD_PAGE_HEIGHT_MM, CARD_PAGE_WIDTH_MM};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the settings file
pub const SETTINGS_FILE: &str = "settings.json";

/// Main application settings container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub editor: EditorDefaults,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Initial layout editor state for new editing sessions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditorDefaults {
    pub show_grid: bool,
    /// Grid cell size in card pixels
    pub grid_size: f64,
    pub snap_to_grid: bool,
    /// Zoom in percent
    pub zoom: u32,
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            show_grid: true,
            grid_size: 20.0,
            snap_to_grid: true,
            zoom: 100,
        }
    }
}

/// PDF export settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub compress: bool,
    #[serde(default)]
    pub author: Option<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            page_width_mm: CARD_PAGE_WIDTH_MM,
            page_height_mm: CARD_PAGE_HEIGHT_MM,
            compress: true,
            author: None,
        }
    }
}

impl ExportSettings {
    pub fn to_pdf_options(&self) -> PdfExportOptions {
        let options = PdfExportOptions::new()
            .with_page_size_mm(self.page_width_mm, self.page_height_mm)
            .with_compression(self.compress);
        match &self.author {
            Some(author) => options.with_author(author.clone()),
            None => options,
        }
    }
}

/// Where cards and templates are kept
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Lost when the application exits
    Memory,
    /// One file per key under the data directory
    #[default]
    Files,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Store directory; relative paths are resolved against the data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl StorageSettings {
    /// Directory of the file store
    pub fn resolve_directory(&self, app_data_dir: &Path) -> PathBuf {
        match &self.directory {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => app_data_dir.join(dir),
            None => app_data_dir.join("store"),
        }
    }
}

/// Settings manager for loading, saving, and updating application settings
pub struct SettingsManager {
    settings_path: PathBuf,
    current: AppSettings,
}

impl SettingsManager {
    /// Create a new settings manager with the given app data directory
    pub fn new(app_data_dir: impl AsRef<Path>) -> Self {
        Self {
            settings_path: app_data_dir.as_ref().join(SETTINGS_FILE),
            current: AppSettings::default(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    fn parse(content: &str) -> AppSettings {
        serde_json::from_str(content).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse settings file, using defaults: {}", e);
            AppSettings::default()
        })
    }

    /// Load settings from disk, or use defaults if the file doesn't exist
    pub async fn load(&mut self) -> Result<&AppSettings> {
        self.current = if tokio::fs::try_exists(&self.settings_path).await? {
            let content = tokio::fs::read_to_string(&self.settings_path).await?;
            Self::parse(&content)
        } else {
            AppSettings::default()
        };
        Ok(&self.current)
    }

    /// Load settings synchronously (for use during app startup)
    pub fn load_sync(&mut self) -> Result<&AppSettings> {
        self.current = if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            Self::parse(&content)
        } else {
            AppSettings::default()
        };
        Ok(&self.current)
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&self.current)?;
        tokio::fs::write(&self.settings_path, content).await?;
        Ok(())
    }

    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    pub fn get(&self) -> &AppSettings {
        &self.current
    }

    /// Update settings and save to disk
    pub async fn update(&mut self, settings: AppSettings) -> Result<()> {
        self.current = settings;
        self.save().await
    }

    pub fn update_sync(&mut self, settings: AppSettings) -> Result<()> {
        self.current = settings;
        self.save_sync()
    }

    /// Reset settings to defaults and save
    pub async fn reset(&mut self) -> Result<&AppSettings> {
        self.current = AppSettings::default();
        self.save().await?;
        Ok(&self.current)
    }

    pub fn reset_sync(&mut self) -> Result<&AppSettings> {
        self.current = AppSettings::default();
        self.save_sync()?;
        Ok(&self.current)
    }

    /// Update only the editor defaults
    pub async fn update_editor(&mut self, editor: EditorDefaults) -> Result<()> {
        self.current.editor = editor;
        self.save().await
    }

    /// Update only the export settings
    pub async fn update_export(&mut self, export: ExportSettings) -> Result<()> {
        self.current.export = export;
        self.save().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert!(settings.editor.show_grid);
        assert_eq!(settings.editor.grid_size, 20.0);
        assert_eq!(settings.editor.zoom, 100);
        assert_eq!(settings.export.page_width_mm, 63.0);
        assert!(settings.export.compress);
        assert_eq!(settings.storage.backend, StorageBackend::Files);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"editor":{"showGrid":false,"gridSize":10,"snapToGrid":false,"zoom":150}}"#)
                .unwrap();
        assert!(!settings.editor.show_grid);
        assert_eq!(settings.export, ExportSettings::default());
    }

    #[test]
    fn test_export_options() {
        let export = ExportSettings {
            page_width_mm: 70.0,
            author: Some("Studio".into()),
            ..Default::default()
        };
        let options = export.to_pdf_options();
        assert_eq!(options.page_width_mm, 70.0);
        assert_eq!(options.author.as_deref(), Some("Studio"));
    }

    #[test]
    fn test_storage_directory() {
        let base = Path::new("/data/app");
        assert_eq!(
            StorageSettings::default().resolve_directory(base),
            PathBuf::from("/data/app/store")
        );
        let custom = StorageSettings {
            directory: Some(PathBuf::from("cards-db")),
            ..Default::default()
        };
        assert_eq!(custom.resolve_directory(base), PathBuf::from("/data/app/cards-db"));
    }

    #[test]
    fn test_settings_manager_load_save_sync() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path());

        let settings = manager.load_sync().unwrap();
        assert_eq!(settings, &AppSettings::default());

        let mut new_settings = AppSettings::default();
        new_settings.editor.grid_size = 10.0;
        new_settings.storage.backend = StorageBackend::Memory;
        manager.update_sync(new_settings).unwrap();

        let mut manager2 = SettingsManager::new(temp_dir.path());
        let loaded = manager2.load_sync().unwrap();
        assert_eq!(loaded.editor.grid_size, 10.0);
        assert_eq!(loaded.storage.backend, StorageBackend::Memory);

        assert_eq!(manager2.reset_sync().unwrap(), &AppSettings::default());
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(SETTINGS_FILE), "not json").unwrap();
        let mut manager = SettingsManager::new(temp_dir.path());
        assert_eq!(manager.load_sync().unwrap(), &AppSettings::default());
    }

    #[tokio::test]
    async fn test_settings_manager_async() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path());
        manager.load().await.unwrap();

        let mut export = ExportSettings::default();
        export.compress = false;
        manager.update_export(export).await.unwrap();

        let mut manager2 = SettingsManager::new(temp_dir.path());
        let loaded = manager2.load().await.unwrap();
        assert!(!loaded.export.compress);
    }
}
