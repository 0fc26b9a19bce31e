//! In-memory template registry

use crate::{CardModelError, CardTemplate, Result};

/// Ordered, in-memory list of templates keyed by id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateRegistry {
    templates: Vec<CardTemplate>,
}

impl TemplateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in templates
    pub fn with_builtin() -> Self {
        Self {
            templates: crate::builtin_templates(),
        }
    }

    /// Create a registry from an existing list, dropping later duplicates of an id
    pub fn from_templates(templates: Vec<CardTemplate>) -> Self {
        let mut registry = Self::new();
        for template in templates {
            if registry.contains(&template.id) {
                tracing::warn!(template_id = %template.id, "Skipping duplicate template id");
                continue;
            }
            registry.templates.push(template);
        }
        registry
    }

    /// All templates in insertion order
    pub fn list(&self) -> &[CardTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn contains(&self, template_id: &str) -> bool {
        self.templates.iter().any(|t| t.id == template_id)
    }

    /// Get a template by id
    pub fn get(&self, template_id: &str) -> Option<&CardTemplate> {
        self.templates.iter().find(|t| t.id == template_id)
    }

    /// Get a template by id or fail with `TemplateNotFound`
    pub fn require(&self, template_id: &str) -> Result<&CardTemplate> {
        self.get(template_id)
            .ok_or_else(|| CardModelError::TemplateNotFound(template_id.to_string()))
    }

    /// Append a new template
    pub fn add(&mut self, template: CardTemplate) -> Result<()> {
        if self.contains(&template.id) {
            return Err(CardModelError::DuplicateTemplate(template.id));
        }
        self.templates.push(template);
        Ok(())
    }

    /// Replace the template with the same id
    pub fn update(&mut self, template: CardTemplate) -> Result<()> {
        let slot = self
            .templates
            .iter_mut()
            .find(|t| t.id == template.id)
            .ok_or_else(|| CardModelError::TemplateNotFound(template.id.clone()))?;
        *slot = template;
        Ok(())
    }

    /// Remove a template by id
    pub fn remove(&mut self, template_id: &str) -> Result<CardTemplate> {
        let index = self
            .templates
            .iter()
            .position(|t| t.id == template_id)
            .ok_or_else(|| CardModelError::TemplateNotFound(template_id.to_string()))?;
        Ok(self.templates.remove(index))
    }

    /// Consume the registry, returning its templates
    pub fn into_templates(self) -> Vec<CardTemplate> {
        self.templates
    }
}
