//! Command system for template editing

use crate::{EditError, Result};
use card_model::{CardField, CardSettings, CardTemplate};
use serde::{Deserialize, Serialize};

/// A single mutation of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TemplateCommand {
    /// Append a new field; its id must not be in use
    AddField { field: CardField },
    /// Replace the field with the same id
    UpdateField { field: CardField },
    /// Remove a field by id
    DeleteField { field_id: String },
    /// Move a field (percent coordinates)
    SetFieldPosition { field_id: String, x: f64, y: f64 },
    /// Resize a field (percent dimensions)
    SetFieldSize {
        field_id: String,
        width: f64,
        height: f64,
    },
    /// Replace the template's physical settings
    UpdateSettings { settings: CardSettings },
}

impl TemplateCommand {
    /// Apply this command to a template in place
    pub fn apply(&self, template: &mut CardTemplate) -> Result<()> {
        match self {
            TemplateCommand::AddField { field } => {
                if template.has_field(&field.id) {
                    return Err(EditError::DuplicateField(field.id.clone()));
                }
                template.fields.push(field.clone());
            }
            TemplateCommand::UpdateField { field } => {
                template.replace_field(field.clone())?;
            }
            TemplateCommand::DeleteField { field_id } => {
                template
                    .remove_field(field_id)
                    .ok_or_else(|| EditError::FieldNotFound(field_id.clone()))?;
            }
            TemplateCommand::SetFieldPosition { field_id, x, y } => {
                let position = field_position(template, field_id)?;
                position.x = *x;
                position.y = *y;
            }
            TemplateCommand::SetFieldSize {
                field_id,
                width,
                height,
            } => {
                let position = field_position(template, field_id)?;
                position.width = Some(*width);
                position.height = Some(*height);
            }
            TemplateCommand::UpdateSettings { settings } => {
                template.settings = settings.clone();
            }
        }
        Ok(())
    }

    /// Get a display name for this command
    pub fn display_name(&self) -> &'static str {
        match self {
            TemplateCommand::AddField { .. } => "Add Field",
            TemplateCommand::UpdateField { .. } => "Edit Field",
            TemplateCommand::DeleteField { .. } => "Delete Field",
            TemplateCommand::SetFieldPosition { .. } => "Move Field",
            TemplateCommand::SetFieldSize { .. } => "Resize Field",
            TemplateCommand::UpdateSettings { .. } => "Template Settings",
        }
    }

    /// Key under which consecutive commands are batched into one undo step
    pub fn merge_key(&self) -> Option<String> {
        match self {
            TemplateCommand::SetFieldPosition { field_id, .. } => Some(format!("move:{}", field_id)),
            TemplateCommand::SetFieldSize { field_id, .. } => Some(format!("resize:{}", field_id)),
            _ => None,
        }
    }
}

fn field_position<'a>(
    template: &'a mut CardTemplate,
    field_id: &str,
) -> Result<&'a mut card_model::Position> {
    template
        .field_mut(field_id)
        .map(CardField::position_mut)
        .ok_or_else(|| EditError::FieldNotFound(field_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_model::{FieldType, Position};

    fn template() -> CardTemplate {
        CardTemplate::new("T", "").with_field(
            CardField::new("a", FieldType::Text)
                .with_name("a")
                .with_position(Position::with_size(1.0, 2.0, 3.0, 4.0)),
        )
    }

    #[test]
    fn test_add_rejects_duplicate() {
        let mut t = template();
        let cmd = TemplateCommand::AddField {
            field: CardField::new("a", FieldType::Number),
        };
        assert!(matches!(cmd.apply(&mut t), Err(EditError::DuplicateField(_))));
        assert_eq!(t.fields.len(), 1);
    }

    #[test]
    fn test_position_and_size() {
        let mut t = template();
        TemplateCommand::SetFieldPosition {
            field_id: "a".into(),
            x: 10.0,
            y: 20.0,
        }
        .apply(&mut t)
        .unwrap();
        TemplateCommand::SetFieldSize {
            field_id: "a".into(),
            width: 30.0,
            height: 40.0,
        }
        .apply(&mut t)
        .unwrap();
        assert_eq!(*t.field("a").unwrap().position(), Position::with_size(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn test_missing_field() {
        let mut t = template();
        let cmd = TemplateCommand::DeleteField {
            field_id: "zzz".into(),
        };
        assert!(matches!(cmd.apply(&mut t), Err(EditError::FieldNotFound(_))));

        let cmd = TemplateCommand::UpdateField {
            field: CardField::new("zzz", FieldType::Text),
        };
        assert!(matches!(cmd.apply(&mut t), Err(EditError::CardModel(_))));
    }

    #[test]
    fn test_merge_keys() {
        let mv = TemplateCommand::SetFieldPosition {
            field_id: "a".into(),
            x: 0.0,
            y: 0.0,
        };
        assert_eq!(mv.merge_key().as_deref(), Some("move:a"));
        assert_eq!(mv.display_name(), "Move Field");
        let del = TemplateCommand::DeleteField {
            field_id: "a".into(),
        };
        assert!(del.merge_key().is_none());
    }

    #[test]
    fn test_command_wire_format() {
        let cmd = TemplateCommand::SetFieldPosition {
            field_id: "a".into(),
            x: 12.5,
            y: 40.0,
        };
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "type": "setFieldPosition", "fieldId": "a", "x": 12.5, "y": 40.0 })
        );

        let parsed: TemplateCommand =
            serde_json::from_str(r#"{"type":"deleteField","fieldId":"a"}"#).unwrap();
        let mut t = template();
        parsed.apply(&mut t).unwrap();
        assert!(t.fields.is_empty());
    }
}
