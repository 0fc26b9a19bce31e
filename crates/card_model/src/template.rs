//! Card templates and their physical settings

use crate::{new_template_id, CardField, CardModelError, Result};
use serde::{Deserialize, Serialize};

/// CSS pixels per inch
pub const CSS_PX_PER_INCH: f64 = 96.0;

/// PDF points per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Measurement unit for template settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "px")]
    Px,
    #[default]
    #[serde(rename = "mm")]
    Mm,
    #[serde(rename = "in")]
    In,
}

impl Unit {
    /// The CSS suffix for this unit
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Mm => "mm",
            Unit::In => "in",
        }
    }

    /// Number of CSS pixels in one unit
    pub fn css_pixels(&self) -> f64 {
        match self {
            Unit::Px => 1.0,
            Unit::Mm => CSS_PX_PER_INCH / MM_PER_INCH,
            Unit::In => CSS_PX_PER_INCH,
        }
    }

    /// Number of PDF points in one unit
    pub fn points(&self) -> f64 {
        match self {
            Unit::Px => POINTS_PER_INCH / CSS_PX_PER_INCH,
            Unit::Mm => POINTS_PER_INCH / MM_PER_INCH,
            Unit::In => POINTS_PER_INCH,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical settings of a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSettings {
    /// Card height in `unit`
    pub height: f64,
    /// Card width in `unit`
    pub width: f64,
    /// Bleed allowance in `unit`
    pub bleed_width: f64,
    /// Safe margin in `unit`
    pub safe_width: f64,
    /// Measurement unit for all of the above
    pub unit: Unit,
}

impl Default for CardSettings {
    /// Standard playing card: 63 x 88 mm with 3 mm bleed
    fn default() -> Self {
        Self {
            height: 88.0,
            width: 63.0,
            bleed_width: 3.0,
            safe_width: 2.0,
            unit: Unit::Mm,
        }
    }
}

impl CardSettings {
    /// Whether both dimensions are strictly positive
    pub fn has_positive_dimensions(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Card size in CSS pixels (without bleed)
    pub fn pixel_size(&self) -> (f64, f64) {
        let factor = self.unit.css_pixels();
        (self.width * factor, self.height * factor)
    }

    /// Card size in PDF points (without bleed)
    pub fn point_size(&self) -> (f64, f64) {
        let factor = self.unit.points();
        (self.width * factor, self.height * factor)
    }

    /// Bleed width in PDF points
    pub fn bleed_points(&self) -> f64 {
        self.bleed_width * self.unit.points()
    }
}

/// A card template: the schema of a card's fields, layout and physical size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub settings: CardSettings,
    pub fields: Vec<CardField>,
}

impl CardTemplate {
    /// Create an empty template with a generated id and default settings
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: new_template_id(),
            name: name.into(),
            description: description.into(),
            settings: CardSettings::default(),
            fields: Vec::new(),
        }
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Replace the settings
    pub fn with_settings(mut self, settings: CardSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Append a field (builder style)
    pub fn with_field(mut self, field: CardField) -> Self {
        self.fields.push(field);
        self
    }

    /// Get a field by id
    pub fn field(&self, field_id: &str) -> Option<&CardField> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    /// Get a mutable field by id
    pub fn field_mut(&mut self, field_id: &str) -> Option<&mut CardField> {
        self.fields.iter_mut().find(|f| f.id == field_id)
    }

    /// Get a field by its data name
    pub fn field_by_name(&self, name: &str) -> Option<&CardField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check whether a field id is already used
    pub fn has_field(&self, field_id: &str) -> bool {
        self.fields.iter().any(|f| f.id == field_id)
    }

    /// Append a field, keeping field ids unique
    pub fn add_field(&mut self, field: CardField) -> Result<()> {
        if self.has_field(&field.id) {
            return Err(CardModelError::DuplicateField(field.id));
        }
        self.fields.push(field);
        Ok(())
    }

    /// Replace the field with the same id
    pub fn replace_field(&mut self, field: CardField) -> Result<()> {
        let slot = self
            .field_mut(&field.id)
            .ok_or_else(|| CardModelError::FieldNotFound(field.id.clone()))?;
        *slot = field;
        Ok(())
    }

    /// Remove a field by id, returning it if it existed
    pub fn remove_field(&mut self, field_id: &str) -> Option<CardField> {
        let index = self.fields.iter().position(|f| f.id == field_id)?;
        Some(self.fields.remove(index))
    }

    /// Validate the template, returning human-readable errors
    pub fn validate(&self) -> Vec<String> {
        crate::validate_template(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldType;

    #[test]
    fn test_unit_serialization() {
        assert_eq!(serde_json::to_string(&Unit::In).unwrap(), "\"in\"");
        assert_eq!(serde_json::to_string(&Unit::Mm).unwrap(), "\"mm\"");
        let unit: Unit = serde_json::from_str("\"px\"").unwrap();
        assert_eq!(unit, Unit::Px);
    }

    #[test]
    fn test_settings_use_camel_case_keys() {
        let json = serde_json::to_value(CardSettings::default()).unwrap();
        assert!(json.get("bleedWidth").is_some());
        assert!(json.get("safeWidth").is_some());
    }

    #[test]
    fn test_unit_conversions() {
        let settings = CardSettings {
            width: 1.0,
            height: 2.0,
            unit: Unit::In,
            ..Default::default()
        };
        assert_eq!(settings.pixel_size(), (96.0, 192.0));
        assert_eq!(settings.point_size(), (72.0, 144.0));

        let mm = Unit::Mm.points() * 25.4;
        assert!((mm - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_add_field_rejects_duplicate_id() {
        let mut template = CardTemplate::new("Test", "");
        template
            .add_field(CardField::new("a", FieldType::Text))
            .unwrap();
        let err = template.add_field(CardField::new("a", FieldType::Number));
        assert!(matches!(err, Err(CardModelError::DuplicateField(_))));
        assert_eq!(template.fields.len(), 1);
    }

    #[test]
    fn test_replace_and_remove_field() {
        let mut template = CardTemplate::new("Test", "")
            .with_field(CardField::new("a", FieldType::Text).with_name("title"));

        let mut updated = template.field("a").unwrap().clone();
        updated.label = "Title".to_string();
        template.replace_field(updated).unwrap();
        assert_eq!(template.field_by_name("title").unwrap().label, "Title");

        assert!(template.remove_field("a").is_some());
        assert!(template.remove_field("a").is_none());
        assert!(template
            .replace_field(CardField::new("missing", FieldType::Text))
            .is_err());
    }
}
