//! Built-in sample templates

use crate::{
    CardField, CardSettings, CardTemplate, FieldStyle, FieldType, FieldValue, LabelPosition,
    LabelStyle, Position, TextAlign, Unit,
};

/// Id of the built-in character card template
pub const CHARACTER_TEMPLATE_ID: &str = "character";

fn labelled(font_size: Option<&str>, label_position: LabelPosition) -> FieldStyle {
    FieldStyle {
        font_size: font_size.map(str::to_string),
        font_family: font_size.map(|_| "Arial".to_string()),
        show_label: Some(true),
        label_style: Some(LabelStyle {
            font_size: Some("12px".to_string()),
            color: Some("#666".to_string()),
            position: Some(label_position),
        }),
        ..Default::default()
    }
}

/// The "Character Card" sample template
pub fn character_card_template() -> CardTemplate {
    let settings = CardSettings {
        height: 750.0,
        width: 1050.0,
        bleed_width: 3.0,
        safe_width: 2.0,
        unit: Unit::Mm,
    };

    CardTemplate::new("Character Card", "A basic character card template")
        .with_id(CHARACTER_TEMPLATE_ID)
        .with_settings(settings)
        .with_field(
            CardField::new("name", FieldType::Text)
                .with_name("name")
                .with_label("Character Name")
                .required()
                .with_position(Position::with_size(50.0, 10.0, 80.0, 8.0).with_z_index(2))
                .with_style(FieldStyle {
                    font_size: Some("24px".to_string()),
                    font_family: Some("Arial".to_string()),
                    text_align: Some(TextAlign::Center),
                    font_weight: Some("bold".to_string()),
                    show_label: Some(false),
                    ..Default::default()
                }),
        )
        .with_field(
            CardField::new("art", FieldType::Image)
                .with_name("art")
                .with_label("Character Art")
                .required()
                .with_position(Position::with_size(10.0, 20.0, 80.0, 40.0).with_z_index(1)),
        )
        .with_field(
            CardField::new("class", FieldType::Select)
                .with_name("class")
                .with_label("Character Class")
                .required()
                .with_options(["Warrior", "Mage", "Rogue", "Cleric"])
                .with_position(Position::with_size(10.0, 65.0, 40.0, 8.0).with_z_index(2))
                .with_style(labelled(Some("16px"), LabelPosition::Top)),
        )
        .with_field(
            CardField::new("strength", FieldType::Number)
                .with_name("strength")
                .with_label("Strength")
                .required()
                .with_bounds(Some(0.0), Some(100.0))
                .with_position(Position::with_size(60.0, 65.0, 30.0, 8.0).with_z_index(2))
                .with_style(labelled(None, LabelPosition::Top)),
        )
        .with_field(
            CardField::new("hitpoints", FieldType::Number)
                .with_name("hitpoints")
                .with_label("Hit Points")
                .required()
                .with_bounds(Some(1.0), Some(999.0))
                .with_position(Position::with_size(10.0, 75.0, 30.0, 8.0).with_z_index(2))
                .with_style(labelled(None, LabelPosition::Top)),
        )
        .with_field(
            CardField::new("isElite", FieldType::Checkbox)
                .with_name("isElite")
                .with_label("Elite Character")
                .with_default(FieldValue::Bool(false))
                .with_position(Position::with_size(60.0, 75.0, 30.0, 8.0).with_z_index(2))
                .with_style(labelled(None, LabelPosition::Left)),
        )
        .with_field(
            CardField::new("description", FieldType::Textarea)
                .with_name("description")
                .with_label("Character Description")
                .with_position(Position::with_size(10.0, 85.0, 80.0, 10.0).with_z_index(2))
                .with_style(labelled(Some("12px"), LabelPosition::Top)),
        )
}

/// All built-in templates, in menu order
pub fn builtin_templates() -> Vec<CardTemplate> {
    vec![character_card_template()]
}
