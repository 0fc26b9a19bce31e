//! Identifier generation for templates and fields

use uuid::Uuid;

/// Prefix used for generated template ids
pub const TEMPLATE_ID_PREFIX: &str = "template";

/// Prefix used for generated field ids
pub const FIELD_ID_PREFIX: &str = "field";

/// Generate a fresh template id (`template-<uuid>`)
pub fn new_template_id() -> String {
    format!("{}-{}", TEMPLATE_ID_PREFIX, Uuid::new_v4().simple())
}

/// Generate a fresh field id (`field-<uuid>`)
pub fn new_field_id() -> String {
    format!("{}-{}", FIELD_ID_PREFIX, Uuid::new_v4().simple())
}
