//! Template previews: sample data and preview scaling

use crate::{RenderError, Result};
use card_model::{CardData, CardField, CardTemplate, FieldType, FieldValue};
use rand::Rng;

/// Image shown for image fields in template previews
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/150";

/// Helpers for previewing a template without real card data
pub struct TemplatePreview;

impl TemplatePreview {
    /// Generate sample data for every field, using the thread-local RNG
    pub fn generate_preview_data(template: &CardTemplate) -> CardData {
        Self::generate_preview_data_with(template, &mut rand::thread_rng())
    }

    /// Generate sample data for every field with the given RNG
    pub fn generate_preview_data_with<R: Rng>(
        template: &CardTemplate,
        rng: &mut R,
    ) -> CardData {
        template
            .fields
            .iter()
            .map(|field| (field.name.clone(), Self::sample_value(field, rng)))
            .collect()
    }

    fn sample_value<R: Rng>(field: &CardField, rng: &mut R) -> FieldValue {
        match field.field_type {
            FieldType::Text | FieldType::Textarea => {
                FieldValue::Text(format!("Sample {}", field.display_label()))
            }
            FieldType::Number => FieldValue::Number(rng.gen_range(0..100) as f64),
            FieldType::Select => {
                FieldValue::Text(field.options().first().cloned().unwrap_or_default())
            }
            FieldType::Checkbox => FieldValue::Bool(true),
            FieldType::Image => FieldValue::text(PLACEHOLDER_IMAGE_URL),
        }
    }

    /// Scale that fits a template of the given size into a container
    pub fn calculate_preview_scale(
        container_width: f64,
        container_height: f64,
        template_width: f64,
        template_height: f64,
    ) -> Result<f64> {
        if template_width <= 0.0 || template_height <= 0.0 {
            return Err(RenderError::InvalidDimensions {
                width: template_width,
                height: template_height,
            });
        }
        let width_scale = container_width / template_width;
        let height_scale = container_height / template_height;
        Ok(width_scale.min(height_scale))
    }

    /// Scale a field's position; fields without a complete position are returned unchanged
    pub fn adjust_field_position(field: &CardField, scale: f64) -> CardField {
        let mut adjusted = field.clone();
        let position = adjusted.position_mut();
        if let (Some(width), Some(height)) = (position.width, position.height) {
            position.x *= scale;
            position.y *= scale;
            position.width = Some(width * scale);
            position.height = Some(height * scale);
        }
        adjusted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_model::{character_card_template, Position};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_preview_data_per_type() {
        let mut rng = StdRng::seed_from_u64(7);
        let data =
            TemplatePreview::generate_preview_data_with(&character_card_template(), &mut rng);

        assert_eq!(data.text("name"), Some("Sample Character Name"));
        assert_eq!(data.text("class"), Some("Warrior"));
        assert_eq!(data.get("isElite"), Some(&FieldValue::Bool(true)));
        assert_eq!(data.text("art"), Some(PLACEHOLDER_IMAGE_URL));

        let strength = data.get("strength").and_then(FieldValue::as_f64).unwrap();
        assert!((0.0..100.0).contains(&strength));
        assert_eq!(strength.fract(), 0.0);
    }

    #[test]
    fn test_sample_text_falls_back_to_name() {
        let template = CardTemplate::new("T", "")
            .with_field(CardField::new("f", FieldType::Textarea).with_name("flavour"))
            .with_field(CardField::new("g", FieldType::Select).with_name("empty"));
        let data = TemplatePreview::generate_preview_data(&template);
        assert_eq!(data.text("flavour"), Some("Sample flavour"));
        assert_eq!(data.text("empty"), Some(""));
    }

    #[test]
    fn test_preview_scale() {
        let scale = TemplatePreview::calculate_preview_scale(400.0, 300.0, 200.0, 300.0).unwrap();
        assert_eq!(scale, 1.0);
        assert!(TemplatePreview::calculate_preview_scale(400.0, 300.0, 0.0, 10.0).is_err());
    }

    #[test]
    fn test_adjust_field_position() {
        let field = CardField::new("f", FieldType::Text)
            .with_position(Position::with_size(10.0, 20.0, 30.0, 40.0).with_z_index(3));
        let adjusted = TemplatePreview::adjust_field_position(&field, 0.5);
        let p = adjusted.position();
        assert_eq!((p.x, p.y, p.width, p.height), (5.0, 10.0, Some(15.0), Some(20.0)));
        assert_eq!(p.z_index, Some(3));

        let incomplete = CardField::new("g", FieldType::Text).with_position(Position::new(10.0, 20.0));
        assert_eq!(TemplatePreview::adjust_field_position(&incomplete, 2.0), incomplete);
    }

    proptest! {
        #[test]
        fn prop_scaled_template_fits_container(
            cw in 1.0..2000.0f64,
            ch in 1.0..2000.0f64,
            tw in 1.0..2000.0f64,
            th in 1.0..2000.0f64,
        ) {
            let scale = TemplatePreview::calculate_preview_scale(cw, ch, tw, th).unwrap();
            prop_assert!(tw * scale <= cw * (1.0 + 1e-9));
            prop_assert!(th * scale <= ch * (1.0 + 1e-9));
        }
    }
}
