//! Template JSON export and import

use super::{TemplateError, TemplateResult};
use card_model::CardTemplate;
use serde_json::Value;
use tracing::info;

/// Top-level keys every imported template must carry
pub const REQUIRED_PROPERTIES: [&str; 5] = ["id", "name", "description", "settings", "fields"];

/// Keys every imported `settings` object must carry
pub const REQUIRED_SETTINGS: [&str; 5] = ["width", "height", "bleedWidth", "safeWidth", "unit"];

/// Serialize a template as 2-space indented JSON
pub fn export_template(template: &CardTemplate) -> TemplateResult<String> {
    Ok(serde_json::to_string_pretty(template)?)
}

/// Parse and structurally check a template.
///
/// Checks run in order: JSON syntax, object shape, required properties,
/// settings shape, required settings, `fields` array, then typed
/// deserialization.
pub fn import_template(json: &str) -> TemplateResult<CardTemplate> {
    let value: Value = serde_json::from_str(json)?;
    check_structure(&value)?;
    let template: CardTemplate = serde_json::from_value(value)?;
    info!(template = %template.id, fields = template.fields.len(), "Imported template");
    Ok(template)
}

fn check_structure(value: &Value) -> TemplateResult<()> {
    let object = value.as_object().ok_or(TemplateError::InvalidStructure)?;
    if let Some(missing) = REQUIRED_PROPERTIES.iter().find(|key| !object.contains_key(**key)) {
        return Err(TemplateError::MissingProperty(missing.to_string()));
    }

    let settings = object
        .get("settings")
        .and_then(Value::as_object)
        .ok_or(TemplateError::InvalidSettings)?;
    if let Some(missing) = REQUIRED_SETTINGS.iter().find(|key| !settings.contains_key(**key)) {
        return Err(TemplateError::MissingSetting(missing.to_string()));
    }

    if !object.get("fields").is_some_and(Value::is_array) {
        return Err(TemplateError::FieldsNotArray);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_model::character_card_template;
    use proptest::prelude::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "id": "t1",
            "name": "Minimal",
            "description": "",
            "settings": {"width": 63, "height": 88, "bleedWidth": 3, "safeWidth": 2, "unit": "mm"},
            "fields": []
        })
    }

    fn import_value(value: &Value) -> TemplateResult<CardTemplate> {
        import_template(&value.to_string())
    }

    #[test]
    fn test_export_is_indented_camel_case() {
        let json = export_template(&character_card_template()).unwrap();
        assert!(json.starts_with("{\n  \"id\": \"character\""));
        assert!(json.contains("\"bleedWidth\""));
        assert!(json.contains("\"zIndex\""));
        assert!(json.contains("\"type\": \"checkbox\""));
    }

    #[test]
    fn test_round_trip_sample() {
        let template = character_card_template();
        let json = export_template(&template).unwrap();
        assert_eq!(import_template(&json).unwrap(), template);
    }

    #[test]
    fn test_minimal_import() {
        let template = import_value(&minimal()).unwrap();
        assert_eq!(template.name, "Minimal");
        assert!(template.fields.is_empty());
    }

    #[test]
    fn test_missing_property_names_the_key() {
        for key in REQUIRED_PROPERTIES {
            let mut value = minimal();
            value.as_object_mut().unwrap().remove(key);
            let err = import_value(&value).unwrap_err();
            assert_eq!(err.to_string(), format!("Missing required property: {}", key));
        }
    }

    #[test]
    fn test_missing_setting_names_the_key() {
        let mut value = minimal();
        value["settings"].as_object_mut().unwrap().remove("bleedWidth");
        let err = import_value(&value).unwrap_err();
        assert_eq!(err.to_string(), "Missing required setting: bleedWidth");
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(import_template("[1, 2]"), Err(TemplateError::InvalidStructure)));
        assert!(matches!(import_template("{not json"), Err(TemplateError::InvalidJson(_))));

        let mut value = minimal();
        value["settings"] = json!("63x88");
        assert!(matches!(import_value(&value), Err(TemplateError::InvalidSettings)));

        let mut value = minimal();
        value["fields"] = json!({});
        assert_eq!(import_value(&value).unwrap_err().to_string(), "Fields must be an array");
    }

    #[test]
    fn test_wrong_types_fail_deserialization() {
        let mut value = minimal();
        value["settings"]["unit"] = json!("furlong");
        assert!(matches!(import_value(&value), Err(TemplateError::InvalidJson(_))));
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            name in "[A-Za-z ]{1,20}",
            width in 1.0f64..500.0,
            height in 1.0f64..500.0,
            bleed in 0.0f64..10.0,
            positions in proptest::collection::vec(
                (0.0f64..100.0, 0.0f64..100.0, 0.0f64..100.0, 0.0f64..100.0),
                1..8,
            ),
        ) {
            let mut template = character_card_template().with_id("prop");
            template.name = name;
            template.settings.width = width;
            template.settings.height = height;
            template.settings.bleed_width = bleed;
            for (field, (x, y, w, h)) in template.fields.iter_mut().zip(positions) {
                let position = field.position_mut();
                position.x = x;
                position.y = y;
                position.width = Some(w);
                position.height = Some(h);
            }

            let json = export_template(&template).unwrap();
            prop_assert_eq!(import_template(&json).unwrap(), template);
        }
    }

    #[test]
    fn test_snapped_percentages_survive_round_trip() {
        let mut template = character_card_template();
        let position = template.fields[0].position_mut();
        position.x = 11.290774160688077;
        position.y = 95.0 / 240.0 * 100.0;
        position.width = Some(100.0 / 3.0);

        let json = export_template(&template).unwrap();
        let imported = import_template(&json).unwrap();
        assert_eq!(imported.fields[0].position(), template.fields[0].position());
    }
}
