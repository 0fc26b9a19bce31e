//! PDF export options

use card_model::{MM_PER_INCH, POINTS_PER_INCH};
use serde::{Deserialize, Serialize};

/// Standard card page width in millimetres
pub const CARD_PAGE_WIDTH_MM: f64 = 63.0;

/// Standard card page height in millimetres
pub const CARD_PAGE_HEIGHT_MM: f64 = 88.0;

/// Options for card PDF export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfExportOptions {
    /// Page width in millimetres
    #[serde(default = "default_page_width")]
    pub page_width_mm: f64,
    /// Page height in millimetres
    #[serde(default = "default_page_height")]
    pub page_height_mm: f64,
    /// Flate-compress content streams
    #[serde(default = "default_compress")]
    pub compress: bool,
    /// Document title
    #[serde(default)]
    pub title: Option<String>,
    /// Document author
    #[serde(default)]
    pub author: Option<String>,
}

fn default_page_width() -> f64 {
    CARD_PAGE_WIDTH_MM
}

fn default_page_height() -> f64 {
    CARD_PAGE_HEIGHT_MM
}

fn default_compress() -> bool {
    true
}

impl Default for PdfExportOptions {
    fn default() -> Self {
        Self {
            page_width_mm: CARD_PAGE_WIDTH_MM,
            page_height_mm: CARD_PAGE_HEIGHT_MM,
            compress: true,
            title: None,
            author: None,
        }
    }
}

impl PdfExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_page_size_mm(mut self, width: f64, height: f64) -> Self {
        self.page_width_mm = width;
        self.page_height_mm = height;
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Page size in PDF points
    pub fn page_size_points(&self) -> (f64, f64) {
        let factor = POINTS_PER_INCH / MM_PER_INCH;
        (self.page_width_mm * factor, self.page_height_mm * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_is_card_sized() {
        let (w, h) = PdfExportOptions::default().page_size_points();
        assert!((w - 178.58).abs() < 0.01);
        assert!((h - 249.45).abs() < 0.01);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: PdfExportOptions = serde_json::from_str(r#"{"title":"Hero"}"#).unwrap();
        assert_eq!(options.title.as_deref(), Some("Hero"));
        assert!(options.compress);
        assert_eq!(options.page_width_mm, CARD_PAGE_WIDTH_MM);
    }
}
