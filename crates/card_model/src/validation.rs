//! Template validation
//!
//! Validation never fails: it returns the list of problems found, in a fixed
//! order, and an empty list for a valid template.

use crate::CardTemplate;

/// Validate a template and return human-readable error messages.
///
/// Checks the template name, the card dimensions, then each field in order
/// (numbered from 1): name, position completeness and bounds, and the label
/// of required fields.
pub fn validate_template(template: &CardTemplate) -> Vec<String> {
    let mut errors = Vec::new();

    if template.name.trim().is_empty() {
        errors.push("Template name is required".to_string());
    }

    if !template.settings.has_positive_dimensions() {
        errors.push("Template dimensions must be positive".to_string());
    }

    for (index, field) in template.fields.iter().enumerate() {
        let n = index + 1;

        if field.name.trim().is_empty() {
            errors.push(format!("Field {}: Name is required", n));
        }

        let position = field.position();
        match (position.width, position.height) {
            (Some(width), Some(height)) => {
                if position.x < 0.0 || position.y < 0.0 || width <= 0.0 || height <= 0.0 {
                    errors.push(format!("Field {}: Invalid position or dimensions", n));
                }
            }
            _ => errors.push(format!("Field {}: Position properties are incomplete", n)),
        }

        if field.required && field.label.trim().is_empty() {
            errors.push(format!("Field {}: Label is required for required fields", n));
        }
    }

    errors
}
