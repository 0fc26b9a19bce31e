//! Card fields: typed, positioned slots within a template

use crate::{new_field_id, FieldValue};
use serde::{Deserialize, Serialize};

/// The fixed set of field types a template can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Select,
    Checkbox,
    Textarea,
    Image,
}

impl FieldType {
    /// All field types, in palette order
    pub const ALL: [FieldType; 6] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Select,
        FieldType::Checkbox,
        FieldType::Textarea,
        FieldType::Image,
    ];

    /// Lowercase name as used in template JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
            FieldType::Textarea => "textarea",
            FieldType::Image => "image",
        }
    }

    /// Display name for palettes and dialogs
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Number => "Number",
            FieldType::Select => "Select",
            FieldType::Checkbox => "Checkbox",
            FieldType::Textarea => "Text Area",
            FieldType::Image => "Image",
        }
    }

    /// Whether this type renders as text on the card
    pub fn is_textual(&self) -> bool {
        matches!(self, FieldType::Text | FieldType::Textarea | FieldType::Select)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a field on the card, in percent of the card's size.
///
/// `x`/`y` are measured from the top-left corner; `width`/`height` are
/// optional in the interchange format but required by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Rotation in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Stacking order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    /// Position with a full bounding box
    pub fn with_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    /// Whether width and height are both present
    pub fn is_complete(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }

    /// Stacking order with the renderer's default of 1
    pub fn effective_z_index(&self) -> i32 {
        self.z_index.unwrap_or(1)
    }
}

/// Text alignment within a field box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Where a field's label sits relative to its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    #[default]
    Top,
    Left,
    Right,
    Bottom,
}

/// Label styling
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<LabelPosition>,
}

/// Visual styling of a field's value, expressed with CSS-like strings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_label: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_style: Option<LabelStyle>,
}

impl FieldStyle {
    /// Whether the label should be drawn next to the value
    pub fn shows_label(&self) -> bool {
        self.show_label.unwrap_or(false)
    }
}

/// Layout settings of a field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldSettings {
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<FieldStyle>,
}

/// Optional validation bounds
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Regular expression a text value must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// One typed, positioned input/output slot of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardField {
    pub id: String,
    /// Key under which the value is stored in card data
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    /// Choices for select fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Initial value for checkbox and select fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldValue>,
    pub settings: FieldSettings,
}

impl CardField {
    /// Create a field with the given id and type and nothing else set
    pub fn new(id: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            field_type,
            label: String::new(),
            required: false,
            validation: None,
            options: None,
            default_value: None,
            settings: FieldSettings::default(),
        }
    }

    /// Create a field with a freshly generated id
    pub fn blank(field_type: FieldType) -> Self {
        Self::new(new_field_id(), field_type)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.settings.position = position;
        self
    }

    pub fn with_style(mut self, style: FieldStyle) -> Self {
        self.settings.style = Some(style);
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        let validation = self.validation.get_or_insert_with(FieldValidation::default);
        validation.min = min;
        validation.max = max;
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.validation
            .get_or_insert_with(FieldValidation::default)
            .pattern = Some(pattern.into());
        self
    }

    pub fn with_default(mut self, value: FieldValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn position(&self) -> &Position {
        &self.settings.position
    }

    pub fn position_mut(&mut self) -> &mut Position {
        &mut self.settings.position
    }

    pub fn style(&self) -> Option<&FieldStyle> {
        self.settings.style.as_ref()
    }

    pub fn min(&self) -> Option<f64> {
        self.validation.as_ref().and_then(|v| v.min)
    }

    pub fn max(&self) -> Option<f64> {
        self.validation.as_ref().and_then(|v| v.max)
    }

    pub fn pattern(&self) -> Option<&str> {
        self.validation.as_ref().and_then(|v| v.pattern.as_deref())
    }

    /// Choices for select fields (empty for other types)
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }

    /// Label if set, otherwise the data name
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}
