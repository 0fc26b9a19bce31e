//! Conversion between stored percent positions and editor pixels
//!
//! Field positions are stored as percentages of the card. The editor works in
//! card pixels (the card's size in CSS pixels at 100% zoom) and in screen
//! pixels (card pixels times the zoom factor).

use card_model::{CardSettings, Position};
use serde::{Deserialize, Serialize};

/// Pointer position in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPoint {
    pub client_x: f64,
    pub client_y: f64,
}

impl ClientPoint {
    pub fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }
}

/// Bounding box of the drop container in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// A rectangle in card pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// Scale every component (card pixels to screen pixels)
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// Size of the card in card pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardGeometry {
    pub width_px: f64,
    pub height_px: f64,
}

impl CardGeometry {
    pub fn from_settings(settings: &CardSettings) -> Self {
        let (width_px, height_px) = settings.pixel_size();
        Self {
            width_px,
            height_px,
        }
    }

    pub fn x_to_percent(&self, px: f64) -> f64 {
        to_percent(px, self.width_px)
    }

    pub fn y_to_percent(&self, px: f64) -> f64 {
        to_percent(px, self.height_px)
    }

    pub fn x_to_px(&self, percent: f64) -> f64 {
        percent / 100.0 * self.width_px
    }

    pub fn y_to_px(&self, percent: f64) -> f64 {
        percent / 100.0 * self.height_px
    }

    /// Pixel rectangle of a stored position; missing sizes use the given fallback
    pub fn to_pixels(&self, position: &Position, fallback: (f64, f64)) -> PixelRect {
        PixelRect {
            x: self.x_to_px(position.x),
            y: self.y_to_px(position.y),
            width: position
                .width
                .map(|w| self.x_to_px(w))
                .unwrap_or(fallback.0),
            height: position
                .height
                .map(|h| self.y_to_px(h))
                .unwrap_or(fallback.1),
        }
    }
}

fn to_percent(px: f64, total: f64) -> f64 {
    if total > 0.0 {
        px / total * 100.0
    } else {
        0.0
    }
}
