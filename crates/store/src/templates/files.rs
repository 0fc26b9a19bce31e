//! Template files on disk

use super::{export_template, import_template, TemplateError, TemplateResult};
use card_model::CardTemplate;
use std::path::{Path, PathBuf};

/// Extension of template files
pub const TEMPLATE_EXTENSION: &str = "cardtpl.json";

/// `<dir>/<slug of the template name>.cardtpl.json`
pub fn template_file_path(dir: impl AsRef<Path>, template: &CardTemplate) -> PathBuf {
    let stem = crate::slugify(&template.name);
    let stem = if stem.is_empty() { template.id.clone() } else { stem };
    dir.as_ref().join(format!("{}.{}", stem, TEMPLATE_EXTENSION))
}

/// Save a template to a file
pub async fn save_template_file(template: &CardTemplate, path: impl AsRef<Path>) -> TemplateResult<()> {
    let json = export_template(template)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Load and validate a template file
pub async fn load_template_file(path: impl AsRef<Path>) -> TemplateResult<CardTemplate> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(TemplateError::FileNotFound(path.display().to_string()));
    }
    let json = tokio::fs::read_to_string(path).await?;
    import_template(&json)
}

/// Save a template synchronously
pub fn save_template_file_sync(template: &CardTemplate, path: impl AsRef<Path>) -> TemplateResult<()> {
    let json = export_template(template)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a template synchronously
pub fn load_template_file_sync(path: impl AsRef<Path>) -> TemplateResult<CardTemplate> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(TemplateError::FileNotFound(path.display().to_string()));
    }
    let json = std::fs::read_to_string(path)?;
    import_template(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_model::character_card_template;
    use tempfile::TempDir;

    #[test]
    fn test_file_path() {
        let path = template_file_path("/tmp/t", &character_card_template());
        assert_eq!(path, PathBuf::from("/tmp/t/character-card.cardtpl.json"));
    }

    #[test]
    fn test_sync_round_trip() {
        let dir = TempDir::new().unwrap();
        let template = character_card_template();
        let path = template_file_path(dir.path(), &template);

        save_template_file_sync(&template, &path).unwrap();
        assert_eq!(load_template_file_sync(&path).unwrap(), template);
    }

    #[tokio::test]
    async fn test_async_round_trip() {
        let dir = TempDir::new().unwrap();
        let template = character_card_template();
        let path = template_file_path(dir.path(), &template);

        save_template_file(&template, &path).await.unwrap();
        assert_eq!(load_template_file(&path).await.unwrap(), template);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_template_file(dir.path().join("nope.cardtpl.json")).await;
        assert!(matches!(result, Err(TemplateError::FileNotFound(_))));
    }

    #[test]
    fn test_invalid_file_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.cardtpl.json");
        std::fs::write(&path, r#"{"id": "x"}"#).unwrap();
        let err = load_template_file_sync(&path).unwrap_err();
        assert_eq!(err.to_string(), "Missing required property: name");
    }
}
