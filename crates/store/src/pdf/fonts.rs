//! Standard 14 fonts and text encoding
//!
//! Card text is drawn with the base fonts every PDF viewer ships. CSS font
//! families are matched by name and fall back to Helvetica.

use super::objects::{PdfDictionary, PdfObject};
use render_model::{CHECK_MARK, CROSS_MARK};

/// The subset of the standard 14 fonts card text can resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    TimesRoman,
    TimesBold,
    Courier,
    CourierBold,
    ZapfDingbats,
}

impl StandardFont {
    /// The `/BaseFont` name
    pub fn pdf_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Text fonts use WinAnsiEncoding; ZapfDingbats keeps its built-in encoding
    pub fn encoding(&self) -> Option<&'static str> {
        match self {
            StandardFont::ZapfDingbats => None,
            _ => Some("WinAnsiEncoding"),
        }
    }

    /// Match a CSS font-family list, taking the first family that resolves
    pub fn from_family(family: Option<&str>, bold: bool) -> Self {
        family
            .into_iter()
            .flat_map(|list| list.split(','))
            .find_map(|name| Self::from_name(name, bold))
            .unwrap_or(Self::fallback(bold))
    }

    /// Match one family name
    pub fn from_name(name: &str, bold: bool) -> Option<Self> {
        let name = name.trim().trim_matches(|c| c == '"' || c == '\'').to_lowercase();
        if name.contains("courier") || name.contains("mono") {
            return Some(Self::pick(StandardFont::Courier, StandardFont::CourierBold, bold));
        }
        if name.contains("helvetica") || name.contains("arial") || name.contains("sans") {
            return Some(Self::pick(StandardFont::Helvetica, StandardFont::HelveticaBold, bold));
        }
        if name.contains("times") || name.contains("georgia") || name.contains("serif") {
            return Some(Self::pick(StandardFont::TimesRoman, StandardFont::TimesBold, bold));
        }
        None
    }

    pub fn fallback(bold: bool) -> Self {
        Self::pick(StandardFont::Helvetica, StandardFont::HelveticaBold, bold)
    }

    fn pick(regular: Self, bold_face: Self, bold: bool) -> Self {
        if bold {
            bold_face
        } else {
            regular
        }
    }

    /// Average glyph advance as a fraction of the font size
    fn average_advance(&self) -> f64 {
        match self {
            StandardFont::Courier | StandardFont::CourierBold => 0.6,
            StandardFont::Helvetica => 0.5,
            StandardFont::HelveticaBold => 0.55,
            StandardFont::TimesRoman => 0.45,
            StandardFont::TimesBold => 0.48,
            StandardFont::ZapfDingbats => 0.8,
        }
    }

    /// Approximate width of a string in points
    pub fn text_width(&self, text: &str, size: f64) -> f64 {
        text.chars().count() as f64 * self.average_advance() * size
    }

    /// Font resource dictionary
    pub fn to_dict(&self) -> PdfDictionary {
        let mut dict = PdfDictionary::typed("Font")
            .with("Subtype", PdfObject::name("Type1"))
            .with("BaseFont", PdfObject::name(self.pdf_name()));
        if let Some(encoding) = self.encoding() {
            dict.insert("Encoding", PdfObject::name(encoding));
        }
        dict
    }
}

/// Fonts used on a page, in first-use order, named `F1`, `F2`, ...
#[derive(Debug, Default)]
pub struct FontSet {
    fonts: Vec<StandardFont>,
}

impl FontSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource name for a font, registering it on first use
    pub fn resource_name(&mut self, font: StandardFont) -> String {
        let index = match self.fonts.iter().position(|f| *f == font) {
            Some(index) => index,
            None => {
                self.fonts.push(font);
                self.fonts.len() - 1
            }
        };
        format!("F{}", index + 1)
    }

    /// `(resource name, font)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (String, StandardFont)> + '_ {
        self.fonts
            .iter()
            .enumerate()
            .map(|(i, font)| (format!("F{}", i + 1), *font))
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

/// Encode text as WinAnsi (Windows-1252); unmappable characters become `?`
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

/// ZapfDingbats code for the checkbox marks shown in previews
pub fn dingbat_code(mark: &str) -> Option<u8> {
    match mark {
        CHECK_MARK => Some(0x33),
        CROSS_MARK => Some(0x37),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_matching() {
        assert_eq!(StandardFont::from_family(Some("Arial"), false), StandardFont::Helvetica);
        assert_eq!(
            StandardFont::from_family(Some("\"Times New Roman\", serif"), true),
            StandardFont::TimesBold
        );
        assert_eq!(
            StandardFont::from_family(Some("sans-serif"), false),
            StandardFont::Helvetica
        );
        assert_eq!(
            StandardFont::from_family(Some("Fira Code, monospace"), false),
            StandardFont::Courier
        );
        assert_eq!(StandardFont::from_family(Some("Papyrus"), true), StandardFont::HelveticaBold);
        assert_eq!(StandardFont::from_family(None, false), StandardFont::Helvetica);
    }

    #[test]
    fn test_font_set_names() {
        let mut fonts = FontSet::new();
        assert_eq!(fonts.resource_name(StandardFont::Helvetica), "F1");
        assert_eq!(fonts.resource_name(StandardFont::ZapfDingbats), "F2");
        assert_eq!(fonts.resource_name(StandardFont::Helvetica), "F1");
        assert_eq!(fonts.len(), 2);
    }

    #[test]
    fn test_font_dict() {
        let dict = StandardFont::TimesBold.to_dict();
        assert_eq!(dict.get("BaseFont"), Some(&PdfObject::name("Times-Bold")));
        assert_eq!(dict.get("Encoding"), Some(&PdfObject::name("WinAnsiEncoding")));
        assert!(StandardFont::ZapfDingbats.to_dict().get("Encoding").is_none());
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Café – 5€"), b"Caf\xE9 \x96 5\x80".to_vec());
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn test_dingbats() {
        assert_eq!(dingbat_code(CHECK_MARK), Some(0x33));
        assert_eq!(dingbat_code(CROSS_MARK), Some(0x37));
        assert_eq!(dingbat_code("x"), None);
    }
}
