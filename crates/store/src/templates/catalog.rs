//! Template list persistence

use super::TemplateResult;
use crate::KeyValueStore;
use card_model::{builtin_templates, CardTemplate, TemplateRegistry};
use tracing::{info, warn};

/// Key of the stored template list
pub const TEMPLATES_KEY: &str = "card-templates";

/// Keeps the user's template list in a key-value store
pub struct TemplateCatalog<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> TemplateCatalog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Stored templates, or the built-in samples when nothing is stored yet.
    ///
    /// A corrupt list is logged and replaced by the built-ins.
    pub fn load(&self) -> TemplateResult<Vec<CardTemplate>> {
        let Some(json) = self.store.get(TEMPLATES_KEY)? else {
            return Ok(builtin_templates());
        };
        match serde_json::from_str::<Vec<CardTemplate>>(&json) {
            Ok(templates) => Ok(templates),
            Err(e) => {
                warn!("Failed to parse stored templates, using built-ins: {}", e);
                Ok(builtin_templates())
            }
        }
    }

    /// Load into a registry
    pub fn load_registry(&self) -> TemplateResult<TemplateRegistry> {
        Ok(TemplateRegistry::from_templates(self.load()?))
    }

    /// Replace the stored list
    pub fn save(&mut self, templates: &[CardTemplate]) -> TemplateResult<()> {
        let json = serde_json::to_string(templates)?;
        self.store.set(TEMPLATES_KEY, &json)?;
        info!(count = templates.len(), "Saved template catalog");
        Ok(())
    }

    /// Forget the stored list so the next load yields the built-ins
    pub fn reset(&mut self) -> TemplateResult<()> {
        self.store.remove(TEMPLATES_KEY)?;
        Ok(())
    }
}
