//! Form controls rendered from form state

use crate::FormState;
use card_model::{CardField, FieldType, FieldValue};
use serde::Serialize;

/// Rows shown by multi-line text areas
pub const TEXT_AREA_ROWS: u32 = 4;

/// MIME filter for image inputs
pub const IMAGE_ACCEPT: &str = "image/*";

/// Kind of input control, with its type-specific configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ControlKind {
    TextInput,
    NumberInput {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Select {
        options: Vec<String>,
    },
    Checkbox {
        checked: bool,
    },
    TextArea {
        rows: u32,
    },
    FileInput {
        accept: String,
    },
}

impl ControlKind {
    fn for_field(field: &CardField, value: Option<&FieldValue>) -> Self {
        match field.field_type {
            FieldType::Text => ControlKind::TextInput,
            FieldType::Number => ControlKind::NumberInput {
                min: field.min(),
                max: field.max(),
            },
            FieldType::Select => ControlKind::Select {
                options: field.options().to_vec(),
            },
            FieldType::Checkbox => ControlKind::Checkbox {
                checked: value.and_then(FieldValue::as_bool).unwrap_or(false),
            },
            FieldType::Textarea => ControlKind::TextArea {
                rows: TEXT_AREA_ROWS,
            },
            FieldType::Image => ControlKind::FileInput {
                accept: IMAGE_ACCEPT.to_string(),
            },
        }
    }
}

/// One rendered form control
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormControl {
    pub field_id: String,
    pub name: String,
    pub label: String,
    pub required: bool,
    pub control: ControlKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    /// Inline error, present only once the field has been touched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Render one control per template field, in template order
pub fn render_form(state: &FormState) -> Vec<FormControl> {
    state
        .template()
        .fields
        .iter()
        .map(|field| {
            let value = state.value(&field.name);
            FormControl {
                field_id: field.id.clone(),
                name: field.name.clone(),
                label: field.label.clone(),
                required: field.required,
                control: ControlKind::for_field(field, value),
                value: value.cloned(),
                error: state.visible_error(&field.name).map(str::to_string),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_model::character_card_template;

    #[test]
    fn test_controls_dispatch_on_type() {
        let state = FormState::new(character_card_template());
        let controls = render_form(&state);

        assert_eq!(controls.len(), 7);
        assert_eq!(controls[0].control, ControlKind::TextInput);
        assert_eq!(
            controls[1].control,
            ControlKind::FileInput {
                accept: "image/*".to_string()
            }
        );
        assert!(matches!(&controls[2].control, ControlKind::Select { options } if options.len() == 4));
        assert_eq!(
            controls[4].control,
            ControlKind::NumberInput {
                min: Some(1.0),
                max: Some(999.0)
            }
        );
        assert_eq!(controls[5].control, ControlKind::Checkbox { checked: false });
        assert_eq!(controls[6].control, ControlKind::TextArea { rows: 4 });
    }

    #[test]
    fn test_errors_shown_after_submit() {
        let mut state = FormState::new(character_card_template());
        assert!(render_form(&state).iter().all(|c| c.error.is_none()));

        let _ = state.submit(|_| ());
        let controls = render_form(&state);
        let name = controls.iter().find(|c| c.name == "name").unwrap();
        assert_eq!(name.error.as_deref(), Some("Character Name is required"));
    }

    #[test]
    fn test_control_json_is_tagged() {
        let state = FormState::new(character_card_template());
        let json = serde_json::to_value(render_form(&state)).unwrap();
        assert_eq!(json[6]["control"]["kind"], "textArea");
        assert_eq!(json[6]["control"]["rows"], 4);
        assert_eq!(json[0]["fieldId"], "name");
    }
}
