//! Template + card data to preview tree conversion

use crate::{
    resolve_label, resolve_text_style, CardRender, ElementContent, ImageSource, PercentRect,
    PositionedElement,
};
use card_model::{format_number, CardData, CardField, CardTemplate, FieldType, FieldValue};

/// Mark shown for a checked checkbox
pub const CHECK_MARK: &str = "✓";

/// Mark shown for an unchecked checkbox
pub const CROSS_MARK: &str = "✗";

/// Build the preview of a card: one positioned element per field, in template order
pub fn render_card(template: &CardTemplate, data: &CardData) -> CardRender {
    let settings = &template.settings;
    let elements = template
        .fields
        .iter()
        .map(|field| render_field(field, data.get(&field.name)))
        .collect();

    CardRender {
        width: settings.width,
        height: settings.height,
        unit: settings.unit,
        padding: settings.bleed_width,
        elements,
    }
}

fn render_field(field: &CardField, value: Option<&FieldValue>) -> PositionedElement {
    let position = field.position();
    PositionedElement {
        field_id: field.id.clone(),
        field_type: field.field_type,
        bounds: PercentRect::new(position.x, position.y, position.width, position.height),
        rotation: position.rotation.unwrap_or(0.0),
        z_index: position.effective_z_index(),
        label: resolve_label(field),
        content: render_content(field, value),
    }
}

fn render_content(field: &CardField, value: Option<&FieldValue>) -> ElementContent {
    let text = |text: String| ElementContent::Text {
        text,
        style: resolve_text_style(field.style()),
    };

    match field.field_type {
        FieldType::Text | FieldType::Textarea | FieldType::Select | FieldType::Number => {
            text(value.map(display_text).unwrap_or_default())
        }
        FieldType::Checkbox => {
            let mark = if value.map_or(false, is_truthy) {
                CHECK_MARK
            } else {
                CROSS_MARK
            };
            text(mark.to_string())
        }
        FieldType::Image => match value {
            Some(FieldValue::File(file)) if !file.is_empty() => ElementContent::Image {
                source: ImageSource::Embedded {
                    name: file.name.clone(),
                    mime_type: file.mime_type.clone(),
                    data_uri: file.to_data_uri(),
                    bytes: file.bytes.clone(),
                },
                alt: field.label.clone(),
            },
            Some(FieldValue::Text(url)) if !url.trim().is_empty() => ElementContent::Image {
                source: ImageSource::Url { url: url.clone() },
                alt: field.label.clone(),
            },
            _ => ElementContent::Empty,
        },
    }
}

fn display_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) => s.clone(),
        FieldValue::Number(n) => format_number(*n),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::File(f) => f.name.clone(),
    }
}

fn is_truthy(value: &FieldValue) -> bool {
    match value {
        FieldValue::Bool(b) => *b,
        FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
        FieldValue::Text(s) => !s.is_empty(),
        FieldValue::File(f) => !f.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;
    use card_model::{character_card_template, LabelPosition, UploadedFile, Unit};

    fn sample_data() -> CardData {
        CardData::new()
            .with("name", "Aria")
            .with("class", "Mage")
            .with("strength", 42.0)
            .with("hitpoints", 12.5)
            .with("isElite", true)
            .with("description", "A wandering scholar")
            .with("art", UploadedFile::new("aria.png", "image/png", vec![7, 8, 9]))
    }

    #[test]
    fn test_container_from_settings() {
        let render = render_card(&character_card_template(), &sample_data());
        assert_eq!(render.width, 1050.0);
        assert_eq!(render.height, 750.0);
        assert_eq!(render.unit, Unit::Mm);
        assert_eq!(render.padding, 3.0);
        assert_eq!(render.outer_size(), (1056.0, 756.0));
        assert_eq!(render.elements.len(), 7);
    }

    #[test]
    fn test_content_per_type() {
        let render = render_card(&character_card_template(), &sample_data());

        assert_eq!(render.element("name").unwrap().content.text(), Some("Aria"));
        assert_eq!(render.element("strength").unwrap().content.text(), Some("42"));
        assert_eq!(render.element("hitpoints").unwrap().content.text(), Some("12.5"));
        assert_eq!(render.element("isElite").unwrap().content.text(), Some("✓"));

        match &render.element("art").unwrap().content {
            ElementContent::Image { source, alt } => {
                assert_eq!(alt, "Character Art");
                assert!(source.src().starts_with("data:image/png;base64,"));
            }
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_unchecked_and_missing_values() {
        let data = CardData::new().with("isElite", false);
        let render = render_card(&character_card_template(), &data);
        assert_eq!(render.element("isElite").unwrap().content.text(), Some("✗"));
        assert_eq!(render.element("name").unwrap().content.text(), Some(""));
        assert_eq!(render.element("art").unwrap().content, ElementContent::Empty);
    }

    #[test]
    fn test_image_url_value() {
        let data = CardData::new().with("art", "https://example.com/a.png");
        let render = render_card(&character_card_template(), &data);
        match &render.element("art").unwrap().content {
            ElementContent::Image {
                source: ImageSource::Url { url },
                ..
            } => assert_eq!(url, "https://example.com/a.png"),
            other => panic!("expected url image, got {:?}", other),
        }
    }

    #[test]
    fn test_labels_and_styles() {
        let render = render_card(&character_card_template(), &sample_data());

        let name = render.element("name").unwrap();
        assert!(name.label.is_none());
        match &name.content {
            ElementContent::Text { style, .. } => {
                assert_eq!(style.font_size, 24.0);
                assert!(style.bold);
            }
            other => panic!("expected text, got {:?}", other),
        }

        let elite = render.element("isElite").unwrap();
        let label = elite.label.as_ref().unwrap();
        assert_eq!(label.text, "Elite Character:");
        assert_eq!(label.color, Color::LABEL_GRAY);
        assert_eq!(label.position, LabelPosition::Left);
    }

    #[test]
    fn test_paint_order_is_stable_by_z_index() {
        let render = render_card(&character_card_template(), &sample_data());
        let order: Vec<&str> = render
            .paint_order()
            .into_iter()
            .map(|e| e.field_id.as_str())
            .collect();
        assert_eq!(
            order,
            vec!["art", "name", "class", "strength", "hitpoints", "isElite", "description"]
        );
    }
}
