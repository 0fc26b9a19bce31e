//! Per-field validation rules

use card_model::{format_number, CardField, FieldType, FieldValue};
use regex_lite::Regex;

/// Validation rule derived from a single field
#[derive(Debug, Clone)]
pub enum FieldRule {
    /// Text and text area fields
    Text {
        required: bool,
        pattern: Option<Regex>,
    },
    /// Select fields: a non-empty value must be one of the options
    Choice {
        required: bool,
        options: Vec<String>,
    },
    /// Number fields with optional inclusive bounds
    Number {
        required: bool,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Checkbox fields: required means the box must be checked
    Flag { required: bool },
    /// Image fields: an upload must have an `image/*` MIME type
    File { required: bool },
}

impl FieldRule {
    /// Derive the rule for a field
    pub fn for_field(field: &CardField) -> Self {
        let required = field.required;
        match field.field_type {
            FieldType::Text | FieldType::Textarea => FieldRule::Text {
                required,
                pattern: field.pattern().and_then(|p| compile_pattern(&field.name, p)),
            },
            FieldType::Select => FieldRule::Choice {
                required,
                options: field.options().to_vec(),
            },
            FieldType::Number => FieldRule::Number {
                required,
                min: field.min(),
                max: field.max(),
            },
            FieldType::Checkbox => FieldRule::Flag { required },
            FieldType::Image => FieldRule::File { required },
        }
    }

    pub fn is_required(&self) -> bool {
        match self {
            FieldRule::Text { required, .. }
            | FieldRule::Choice { required, .. }
            | FieldRule::Number { required, .. }
            | FieldRule::Flag { required }
            | FieldRule::File { required } => *required,
        }
    }

    /// Check a value, returning the first failing rule's message
    pub fn check(&self, label: &str, value: Option<&FieldValue>) -> Option<String> {
        let blank = value.map_or(true, FieldValue::is_blank);
        let required_message = || format!("{} is required", label);

        match self {
            FieldRule::Text { required, pattern } => {
                if blank {
                    return required.then(required_message);
                }
                let text = value.map(value_text).unwrap_or_default();
                match pattern {
                    Some(regex) if !regex.is_match(&text) => {
                        Some(format!("{} has an invalid format", label))
                    }
                    _ => None,
                }
            }
            FieldRule::Choice { required, options } => {
                if blank {
                    return required.then(required_message);
                }
                let text = value.map(value_text).unwrap_or_default();
                if !options.is_empty() && !options.iter().any(|o| *o == text) {
                    return Some(format!("{} must be one of the available options", label));
                }
                None
            }
            FieldRule::Number { required, min, max } => {
                if blank {
                    return required.then(required_message);
                }
                let number = match value.and_then(parse_number) {
                    Some(n) => n,
                    None => return Some(format!("{} must be a number", label)),
                };
                if let Some(min) = min {
                    if number < *min {
                        return Some(format!(
                            "{} must be greater than or equal to {}",
                            label,
                            format_number(*min)
                        ));
                    }
                }
                if let Some(max) = max {
                    if number > *max {
                        return Some(format!(
                            "{} must be less than or equal to {}",
                            label,
                            format_number(*max)
                        ));
                    }
                }
                None
            }
            FieldRule::Flag { required } => {
                let checked = matches!(value, Some(FieldValue::Bool(true)));
                (*required && !checked).then(required_message)
            }
            FieldRule::File { required } => match value {
                Some(FieldValue::File(file)) if !file.is_empty() => {
                    (!file.is_image()).then(|| "Please upload an image file".to_string())
                }
                // A non-empty text value is an image reference (URL)
                Some(FieldValue::Text(_)) if !blank => None,
                Some(FieldValue::Bool(_)) | Some(FieldValue::Number(_)) if !blank => {
                    Some("Please upload an image file".to_string())
                }
                _ => required.then(required_message),
            },
        }
    }
}

fn compile_pattern(field_name: &str, pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!(field = field_name, pattern, error = %e, "Ignoring invalid field pattern");
            None
        }
    }
}

fn value_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) => s.clone(),
        FieldValue::Number(n) => format_number(*n),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::File(f) => f.name.clone(),
    }
}

/// Interpret a value as a number, accepting numeric text from inputs
pub fn parse_number(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) if n.is_finite() => Some(*n),
        FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_model::UploadedFile;
    use proptest::prelude::*;

    fn number_rule() -> FieldRule {
        FieldRule::for_field(
            &CardField::new("hp", FieldType::Number)
                .with_name("hp")
                .with_label("Hit Points")
                .required()
                .with_bounds(Some(1.0), Some(999.0)),
        )
    }

    #[test]
    fn test_number_bounds_messages() {
        let rule = number_rule();
        assert_eq!(
            rule.check("Hit Points", Some(&FieldValue::Number(0.0))),
            Some("Hit Points must be greater than or equal to 1".to_string())
        );
        assert_eq!(
            rule.check("Hit Points", Some(&FieldValue::Number(1000.0))),
            Some("Hit Points must be less than or equal to 999".to_string())
        );
        assert_eq!(rule.check("Hit Points", Some(&FieldValue::Number(50.0))), None);
    }

    #[test]
    fn test_number_accepts_numeric_text() {
        let rule = number_rule();
        assert_eq!(rule.check("Hit Points", Some(&FieldValue::text("12"))), None);
        assert_eq!(
            rule.check("Hit Points", Some(&FieldValue::text("abc"))),
            Some("Hit Points must be a number".to_string())
        );
        assert_eq!(
            rule.check("Hit Points", Some(&FieldValue::text(""))),
            Some("Hit Points is required".to_string())
        );
    }

    #[test]
    fn test_required_text() {
        let rule = FieldRule::Text {
            required: true,
            pattern: None,
        };
        assert_eq!(rule.check("Name", None), Some("Name is required".to_string()));
        assert_eq!(rule.check("Name", Some(&FieldValue::text("Aria"))), None);

        let optional = FieldRule::Text {
            required: false,
            pattern: None,
        };
        assert_eq!(optional.check("Name", Some(&FieldValue::text(""))), None);
    }

    #[test]
    fn test_text_pattern() {
        let field = CardField::new("code", FieldType::Text)
            .with_name("code")
            .with_pattern("^[A-Z]{3}$");
        let rule = FieldRule::for_field(&field);
        assert_eq!(rule.check("Code", Some(&FieldValue::text("ABC"))), None);
        assert_eq!(
            rule.check("Code", Some(&FieldValue::text("abc"))),
            Some("Code has an invalid format".to_string())
        );
    }

    #[test]
    fn test_invalid_pattern_is_ignored() {
        let field = CardField::new("code", FieldType::Text)
            .with_name("code")
            .with_pattern("([unclosed");
        let rule = FieldRule::for_field(&field);
        assert!(matches!(rule, FieldRule::Text { pattern: None, .. }));
        assert_eq!(rule.check("Code", Some(&FieldValue::text("anything"))), None);
    }

    #[test]
    fn test_choice_must_be_an_option() {
        let rule = FieldRule::Choice {
            required: true,
            options: vec!["Warrior".to_string(), "Mage".to_string()],
        };
        assert_eq!(rule.check("Class", Some(&FieldValue::text("Mage"))), None);
        assert_eq!(
            rule.check("Class", Some(&FieldValue::text("Bard"))),
            Some("Class must be one of the available options".to_string())
        );
        assert_eq!(
            rule.check("Class", Some(&FieldValue::text(""))),
            Some("Class is required".to_string())
        );
    }

    #[test]
    fn test_required_flag_must_be_checked() {
        let rule = FieldRule::Flag { required: true };
        assert!(rule.check("Agree", Some(&FieldValue::Bool(false))).is_some());
        assert!(rule.check("Agree", Some(&FieldValue::Bool(true))).is_none());
        assert!(FieldRule::Flag { required: false }
            .check("Agree", Some(&FieldValue::Bool(false)))
            .is_none());
    }

    #[test]
    fn test_file_rule() {
        let rule = FieldRule::File { required: true };
        let empty = FieldValue::File(UploadedFile::empty());
        let pdf = FieldValue::File(UploadedFile::new("a.pdf", "application/pdf", vec![1]));
        let png = FieldValue::File(UploadedFile::new("a.png", "image/png", vec![1]));

        assert_eq!(rule.check("Art", Some(&empty)), Some("Art is required".to_string()));
        assert_eq!(
            rule.check("Art", Some(&pdf)),
            Some("Please upload an image file".to_string())
        );
        assert_eq!(rule.check("Art", Some(&png)), None);
        assert_eq!(FieldRule::File { required: false }.check("Art", Some(&empty)), None);
    }

    proptest! {
        #[test]
        fn prop_numbers_within_bounds_pass(n in 1.0..=999.0f64) {
            prop_assert_eq!(number_rule().check("Hit Points", Some(&FieldValue::Number(n))), None);
        }

        #[test]
        fn prop_numbers_outside_bounds_fail(n in prop_oneof![-1e6..1.0f64, 999.0001..1e6f64]) {
            prop_assert!(number_rule().check("Hit Points", Some(&FieldValue::Number(n))).is_some());
        }
    }
}
