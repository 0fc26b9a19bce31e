//! Form state: values, touched fields and errors

use crate::{FormError, FormSchema, FormTemplate, Result};
use card_model::{CardData, CardTemplate, FieldType, FieldValue};
use std::collections::{BTreeMap, BTreeSet};

/// Editable state of a generated form
#[derive(Debug, Clone)]
pub struct FormState {
    form: FormTemplate,
    schema: FormSchema,
    values: CardData,
    touched: BTreeSet<String>,
    errors: BTreeMap<String, String>,
}

impl FormState {
    /// Create a form for a template, starting from its initial values
    pub fn new(template: CardTemplate) -> Self {
        let form = FormTemplate::new(template);
        let schema = form.validation_schema();
        let values = form.initial_values();
        Self {
            form,
            schema,
            values,
            touched: BTreeSet::new(),
            errors: BTreeMap::new(),
        }
    }

    pub fn template(&self) -> &CardTemplate {
        self.form.template()
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &CardData {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The error to display inline: only shown once the field is touched
    pub fn visible_error(&self, name: &str) -> Option<&str> {
        if self.is_touched(name) {
            self.errors.get(name).map(String::as_str)
        } else {
            None
        }
    }

    /// Set a field's value and re-validate that field
    pub fn set_value(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        if self.template().field_by_name(name).is_none() {
            return Err(FormError::UnknownField(name.to_string()));
        }
        self.values.insert(name, value);
        self.validate_field(name);
        Ok(())
    }

    /// Set a field from raw input text, coercing it to the field's type
    pub fn set_input(&mut self, name: &str, raw: &str) -> Result<()> {
        let field_type = self
            .template()
            .field_by_name(name)
            .map(|f| f.field_type)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;

        let value = match field_type {
            FieldType::Number => match raw.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => FieldValue::Number(n),
                _ => FieldValue::text(raw),
            },
            FieldType::Checkbox => {
                FieldValue::Bool(matches!(raw.trim(), "true" | "on" | "1" | "checked"))
            }
            FieldType::Text | FieldType::Textarea | FieldType::Select | FieldType::Image => {
                FieldValue::text(raw)
            }
        };
        self.set_value(name, value)
    }

    /// Mark a field as touched (blurred)
    pub fn touch(&mut self, name: &str) {
        self.touched.insert(name.to_string());
        self.validate_field(name);
    }

    /// Validate a single field, updating the error map
    pub fn validate_field(&mut self, name: &str) -> Option<String> {
        match self.schema.validate_value(name, self.values.get(name)) {
            Some(message) => {
                self.errors.insert(name.to_string(), message.clone());
                Some(message)
            }
            None => {
                self.errors.remove(name);
                None
            }
        }
    }

    /// Validate every field, replacing the error map
    pub fn validate_all(&mut self) -> &BTreeMap<String, String> {
        self.errors = self.schema.validate(&self.values);
        &self.errors
    }

    /// Submit the form.
    ///
    /// Touches every field and validates all of them. `on_success` is only
    /// invoked when there are no errors; otherwise the errors are returned.
    pub fn submit<T>(&mut self, on_success: impl FnOnce(&CardData) -> T) -> Result<T> {
        let names: Vec<String> = self.schema.field_names().cloned().collect();
        self.touched.extend(names);
        self.validate_all();

        if !self.errors.is_empty() {
            return Err(FormError::Invalid {
                errors: self.errors.clone(),
            });
        }
        Ok(on_success(&self.values))
    }

    /// Restore initial values and clear touched/errors
    pub fn reset(&mut self) {
        self.values = self.form.initial_values();
        self.touched.clear();
        self.errors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_model::{character_card_template, CardField, UploadedFile};

    fn simple_template() -> CardTemplate {
        CardTemplate::new("Simple", "")
            .with_field(
                CardField::new("f1", FieldType::Text)
                    .with_name("title")
                    .with_label("Title")
                    .required(),
            )
            .with_field(
                CardField::new("f2", FieldType::Text)
                    .with_name("subtitle")
                    .with_label("Subtitle")
                    .required(),
            )
            .with_field(CardField::new("f3", FieldType::Text).with_name("notes"))
    }

    #[test]
    fn test_submit_with_missing_required_fields() {
        let mut form = FormState::new(simple_template());
        let mut called = false;

        let result = form.submit(|_| called = true);

        assert!(!called);
        match result {
            Err(FormError::Invalid { errors }) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors["title"], "Title is required");
                assert_eq!(errors["subtitle"], "Subtitle is required");
            }
            other => panic!("expected invalid form, got {:?}", other),
        }
        assert!(form.is_touched("notes"));
        assert_eq!(form.visible_error("title"), Some("Title is required"));
    }

    #[test]
    fn test_submit_success_passes_values() {
        let mut form = FormState::new(simple_template());
        form.set_value("title", "Hello").unwrap();
        form.set_value("subtitle", "World").unwrap();

        let title = form
            .submit(|values| values.text("title").map(str::to_string))
            .unwrap();
        assert_eq!(title.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_errors_hidden_until_touched() {
        let mut form = FormState::new(simple_template());
        form.set_value("title", "").unwrap();
        assert!(form.errors().contains_key("title"));
        assert_eq!(form.visible_error("title"), None);

        form.touch("title");
        assert_eq!(form.visible_error("title"), Some("Title is required"));
    }

    #[test]
    fn test_unknown_field() {
        let mut form = FormState::new(simple_template());
        assert!(matches!(
            form.set_value("missing", "x"),
            Err(FormError::UnknownField(_))
        ));
    }

    #[test]
    fn test_set_input_coerces_by_type() {
        let mut form = FormState::new(character_card_template());
        form.set_input("strength", "42").unwrap();
        form.set_input("isElite", "on").unwrap();
        form.set_input("hitpoints", "lots").unwrap();

        assert_eq!(form.value("strength"), Some(&FieldValue::Number(42.0)));
        assert_eq!(form.value("isElite"), Some(&FieldValue::Bool(true)));
        assert_eq!(
            form.errors().get("hitpoints").map(String::as_str),
            Some("Hit Points must be a number")
        );
    }

    #[test]
    fn test_character_card_submits_when_complete() {
        let mut form = FormState::new(character_card_template());
        form.set_value("name", "Aria").unwrap();
        form.set_value("art", UploadedFile::new("a.png", "image/png", vec![1, 2]))
            .unwrap();
        form.set_value("class", "Mage").unwrap();
        form.set_value("hitpoints", 12.0).unwrap();

        assert!(form.submit(|values| values.len()).is_ok());

        form.reset();
        assert_eq!(form.value("name"), Some(&FieldValue::text("")));
        assert!(!form.is_touched("name"));
    }
}
