//! CSS-like style parsing for field styles

use crate::{Color, ElementLabel, TextStyle};
use card_model::{CardField, FieldStyle};

/// Value font size when a field has none
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// Label font size when the label style has none
pub const DEFAULT_LABEL_FONT_SIZE_PX: f64 = 12.0;

/// Parse a CSS colour: `#rgb`, `#rrggbb`, `#rrggbbaa` or a basic named colour
pub fn parse_css_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    let named = match value.to_ascii_lowercase().as_str() {
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "transparent" => Color::TRANSPARENT,
        "red" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 128, 0),
        "blue" => Color::rgb(0, 0, 255),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "silver" => Color::rgb(192, 192, 192),
        "yellow" => Color::rgb(255, 255, 0),
        "orange" => Color::rgb(255, 165, 0),
        "purple" => Color::rgb(128, 0, 128),
        "maroon" => Color::rgb(128, 0, 0),
        "navy" => Color::rgb(0, 0, 128),
        _ => return None,
    };
    Some(named)
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some(Color::rgb(digits.next()??, digits.next()??, digits.next()??))
        }
        6 => Some(Color::rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        8 => Some(Color::rgba(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        )),
        _ => None,
    }
}

/// Parse a CSS font size into pixels: `24px`, `12pt`, `1.5em`/`rem` or a bare number
pub fn parse_font_size(value: &str) -> Option<f64> {
    let value = value.trim().to_ascii_lowercase();
    let (number, factor) = if let Some(n) = value.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("pt") {
        (n, 96.0 / 72.0)
    } else if let Some(n) = value.strip_suffix("rem") {
        (n, DEFAULT_FONT_SIZE_PX)
    } else if let Some(n) = value.strip_suffix("em") {
        (n, DEFAULT_FONT_SIZE_PX)
    } else {
        (value.as_str(), 1.0)
    };

    number
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n > 0.0)
        .map(|n| n * factor)
}

/// Whether a CSS font weight is bold (`bold`, `bolder` or numeric ≥ 600)
pub fn is_bold(weight: &str) -> bool {
    match weight.trim().to_ascii_lowercase().as_str() {
        "bold" | "bolder" => true,
        other => other.parse::<u32>().map(|w| w >= 600).unwrap_or(false),
    }
}

/// Resolve the value style of a field, applying defaults
pub fn resolve_text_style(style: Option<&FieldStyle>) -> TextStyle {
    let Some(style) = style else {
        return TextStyle::default();
    };

    TextStyle {
        font_size: style
            .font_size
            .as_deref()
            .and_then(parse_font_size)
            .unwrap_or(DEFAULT_FONT_SIZE_PX),
        font_family: style.font_family.clone(),
        color: style
            .color
            .as_deref()
            .and_then(parse_css_color)
            .unwrap_or(Color::BLACK),
        align: style.text_align.unwrap_or_default(),
        bold: style.font_weight.as_deref().map(is_bold).unwrap_or(false),
    }
}

/// Resolve the label of a field, if its style asks for one
pub fn resolve_label(field: &CardField) -> Option<ElementLabel> {
    let style = field.style().filter(|s| s.shows_label())?;
    let label_style = style.label_style.clone().unwrap_or_default();

    Some(ElementLabel {
        text: format!("{}:", field.label),
        font_size: label_style
            .font_size
            .as_deref()
            .and_then(parse_font_size)
            .unwrap_or(DEFAULT_LABEL_FONT_SIZE_PX),
        color: label_style
            .color
            .as_deref()
            .and_then(parse_css_color)
            .unwrap_or(Color::LABEL_GRAY),
        position: label_style.position.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_model::{FieldType, LabelPosition, TextAlign};

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_css_color("#666"), Some(Color::rgb(0x66, 0x66, 0x66)));
        assert_eq!(parse_css_color("#1a2B3c"), Some(Color::rgb(0x1a, 0x2b, 0x3c)));
        assert_eq!(parse_css_color("#ff000080"), Some(Color::rgba(255, 0, 0, 128)));
        assert_eq!(parse_css_color("#12"), None);
        assert_eq!(parse_css_color("#ggg"), None);
    }

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(parse_css_color("Red"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(parse_css_color("chartreuse-ish"), None);
    }

    #[test]
    fn test_parse_font_sizes() {
        assert_eq!(parse_font_size("24px"), Some(24.0));
        assert!((parse_font_size("12pt").unwrap() - 16.0).abs() < 1e-9);
        assert_eq!(parse_font_size("1.5em"), Some(24.0));
        assert_eq!(parse_font_size("2rem"), Some(32.0));
        assert_eq!(parse_font_size("14"), Some(14.0));
        assert_eq!(parse_font_size("large"), None);
        assert_eq!(parse_font_size("-3px"), None);
    }

    #[test]
    fn test_bold_detection() {
        assert!(is_bold("bold"));
        assert!(is_bold("700"));
        assert!(!is_bold("normal"));
        assert!(!is_bold("400"));
    }

    #[test]
    fn test_resolve_text_style() {
        let style = FieldStyle {
            font_size: Some("24px".to_string()),
            font_family: Some("Arial".to_string()),
            text_align: Some(TextAlign::Center),
            font_weight: Some("bold".to_string()),
            ..Default::default()
        };
        let resolved = resolve_text_style(Some(&style));
        assert_eq!(resolved.font_size, 24.0);
        assert_eq!(resolved.align, TextAlign::Center);
        assert!(resolved.bold);
        assert_eq!(resolve_text_style(None), TextStyle::default());
    }

    #[test]
    fn test_label_defaults() {
        let field = CardField::new("f", FieldType::Text)
            .with_label("Power")
            .with_style(FieldStyle {
                show_label: Some(true),
                ..Default::default()
            });
        let label = resolve_label(&field).unwrap();
        assert_eq!(label.text, "Power:");
        assert_eq!(label.font_size, 12.0);
        assert_eq!(label.color, Color::LABEL_GRAY);
        assert_eq!(label.position, LabelPosition::Top);

        let hidden = CardField::new("g", FieldType::Text).with_label("Hidden");
        assert!(resolve_label(&hidden).is_none());
    }
}
