//! Form schema derivation from a template

use crate::FieldRule;
use card_model::{CardData, CardTemplate, FieldType, FieldValue, UploadedFile};
use std::collections::BTreeMap;

/// Per-field rules keyed by field name
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    rules: BTreeMap<String, FieldRule>,
    labels: BTreeMap<String, String>,
}

impl FormSchema {
    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.rules.get(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &String> {
        self.rules.keys()
    }

    /// Validate one value, returning its error message if any
    pub fn validate_value(&self, name: &str, value: Option<&FieldValue>) -> Option<String> {
        let rule = self.rules.get(name)?;
        let label = self.labels.get(name).map(String::as_str).unwrap_or(name);
        rule.check(label, value)
    }

    /// Validate all values, returning one error per failing field
    pub fn validate(&self, values: &CardData) -> BTreeMap<String, String> {
        self.rules
            .keys()
            .filter_map(|name| {
                self.validate_value(name, values.get(name))
                    .map(|message| (name.clone(), message))
            })
            .collect()
    }
}

/// A template wrapped for form generation
#[derive(Debug, Clone, PartialEq)]
pub struct FormTemplate {
    template: CardTemplate,
}

impl FormTemplate {
    pub fn new(template: CardTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &CardTemplate {
        &self.template
    }

    pub fn into_template(self) -> CardTemplate {
        self.template
    }

    /// Derive the validation schema: one rule per field, keyed by field name
    pub fn validation_schema(&self) -> FormSchema {
        let mut schema = FormSchema::default();
        for field in &self.template.fields {
            schema
                .rules
                .insert(field.name.clone(), FieldRule::for_field(field));
            schema
                .labels
                .insert(field.name.clone(), field.display_label().to_string());
        }
        schema
    }

    /// Initial form values for every field
    pub fn initial_values(&self) -> CardData {
        self.template
            .fields
            .iter()
            .map(|field| {
                let value = match field.field_type {
                    FieldType::Text | FieldType::Textarea => FieldValue::text(""),
                    FieldType::Number => FieldValue::Number(0.0),
                    FieldType::Image => FieldValue::File(UploadedFile::empty()),
                    FieldType::Checkbox => field
                        .default_value
                        .clone()
                        .filter(|v| matches!(v, FieldValue::Bool(_)))
                        .unwrap_or(FieldValue::Bool(false)),
                    FieldType::Select => field
                        .default_value
                        .clone()
                        .unwrap_or_else(|| FieldValue::text("")),
                };
                (field.name.clone(), value)
            })
            .collect()
    }
}
