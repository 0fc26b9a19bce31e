//! Preview tree types

use card_model::{FieldType, LabelPosition, TextAlign, Unit};
use serde::{Deserialize, Serialize};

/// Bounds of an element, in percent of the card's content box.
///
/// Missing width or height means the element sizes itself to its content.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentRect {
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl PercentRect {
    pub fn new(x: f64, y: f64, width: Option<f64>, height: Option<f64>) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Resolve against a content box of the given size
    pub fn resolve(&self, box_width: f64, box_height: f64) -> Rect {
        Rect::new(
            self.x / 100.0 * box_width,
            self.y / 100.0 * box_height,
            self.width.unwrap_or(0.0) / 100.0 * box_width,
            self.height.unwrap_or(0.0) / 100.0 * box_height,
        )
    }
}

/// A rectangle in absolute coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    /// Default label colour (`#666`)
    pub const LABEL_GRAY: Color = Color::rgb(0x66, 0x66, 0x66);

    /// Channels as fractions in `0.0..=1.0`
    pub fn to_unit_rgb(&self) -> (f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Resolved text styling of an element's value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Font size in CSS pixels
    pub font_size: f64,
    pub font_family: Option<String>,
    pub color: Color,
    pub align: TextAlign,
    pub bold: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: crate::DEFAULT_FONT_SIZE_PX,
            font_family: None,
            color: Color::BLACK,
            align: TextAlign::Left,
            bold: false,
        }
    }
}

/// Label drawn before an element's value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementLabel {
    /// Label text including the trailing colon
    pub text: String,
    /// Font size in CSS pixels
    pub font_size: f64,
    pub color: Color,
    pub position: LabelPosition,
}

/// Source of an image element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ImageSource {
    /// An uploaded file
    Embedded {
        name: String,
        mime_type: String,
        data_uri: String,
        #[serde(skip)]
        bytes: Vec<u8>,
    },
    /// An external image reference
    Url { url: String },
}

impl ImageSource {
    /// The value usable as an `src` attribute
    pub fn src(&self) -> &str {
        match self {
            ImageSource::Embedded { data_uri, .. } => data_uri,
            ImageSource::Url { url } => url,
        }
    }
}

/// What an element displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ElementContent {
    Text { text: String, style: TextStyle },
    Image { source: ImageSource, alt: String },
    Empty,
}

impl ElementContent {
    pub fn text(&self) -> Option<&str> {
        match self {
            ElementContent::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// One field placed on the card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedElement {
    pub field_id: String,
    pub field_type: FieldType,
    pub bounds: PercentRect,
    /// Rotation in degrees (clockwise)
    pub rotation: f64,
    pub z_index: i32,
    pub label: Option<ElementLabel>,
    pub content: ElementContent,
}

/// The preview of one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRender {
    /// Card width in `unit`
    pub width: f64,
    /// Card height in `unit`
    pub height: f64,
    pub unit: Unit,
    /// Padding around the content box (the bleed width), in `unit`
    pub padding: f64,
    /// Elements in template order
    pub elements: Vec<PositionedElement>,
}

impl CardRender {
    /// Outer size including padding on both sides, in `unit`
    pub fn outer_size(&self) -> (f64, f64) {
        (
            self.width + 2.0 * self.padding,
            self.height + 2.0 * self.padding,
        )
    }

    /// Elements sorted by z-index, lowest first; equal z-indices keep template order
    pub fn paint_order(&self) -> Vec<&PositionedElement> {
        let mut ordered: Vec<&PositionedElement> = self.elements.iter().collect();
        ordered.sort_by_key(|e| e.z_index);
        ordered
    }

    pub fn element(&self, field_id: &str) -> Option<&PositionedElement> {
        self.elements.iter().find(|e| e.field_id == field_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_card;
    use card_model::{character_card_template, CardData, UploadedFile};
    use serde_json::json;

    #[test]
    fn test_render_serializes_camel_case() {
        let data = CardData::new()
            .with("name", "Aria")
            .with("art", UploadedFile::new("aria.png", "image/png", vec![1, 2, 3]));
        let render = render_card(&character_card_template(), &data);
        let value = serde_json::to_value(&render).unwrap();

        let name = &value["elements"][0];
        assert_eq!(name["fieldId"], json!("name"));
        assert!(name.get("zIndex").is_some());
        assert_eq!(name["content"]["kind"], json!("text"));
        assert_eq!(name["content"]["text"], json!("Aria"));
        assert!(name["content"]["style"].get("fontSize").is_some());

        let art = value["elements"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["fieldType"] == json!("image"))
            .unwrap();
        let source = &art["content"]["source"];
        assert_eq!(source["kind"], json!("embedded"));
        assert_eq!(source["mimeType"], json!("image/png"));
        assert!(source["dataUri"].as_str().unwrap().starts_with("data:image/png;base64,"));
        assert!(source.get("bytes").is_none());
    }
}
