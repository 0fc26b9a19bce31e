//! Card preview to PDF conversion
//!
//! Paints a [`CardRender`] onto a single page. The card (content box plus
//! bleed) is scaled uniformly to fit the page and centred on it.

use super::content::ContentStream;
use super::fonts::{dingbat_code, encode_win_ansi, FontSet, StandardFont};
use super::images::JpegImage;
use super::objects::{PdfDictionary, PdfObject, PdfStream, PdfString};
use super::options::PdfExportOptions;
use super::writer::{PdfError, PdfWriter, Result};
use card_model::{FieldType, LabelPosition, TextAlign};
use render_model::{
    CardRender, Color, ElementContent, ElementLabel, ImageSource, PositionedElement, TextStyle,
};
use tracing::{debug, warn};

/// PDF points per CSS pixel
const PT_PER_PX: f64 = 0.75;

/// Line height as a multiple of the font size
const LINE_HEIGHT: f64 = 1.2;

/// Baseline offset from the top of a line, as a multiple of the font size
const BASELINE: f64 = 0.9;

/// Gap between a side label and its value, in points
const LABEL_GAP: f64 = 3.0;

/// Size of an image with no explicit bounds and no intrinsic size, in points
const PLACEHOLDER_SIZE: f64 = 36.0;

/// Placeholder frame colour
const PLACEHOLDER_GRAY: Color = Color::rgb(0xBB, 0xBB, 0xBB);

/// Render a card to PDF bytes
pub fn render_card_pdf(card: &CardRender, options: &PdfExportOptions) -> Result<Vec<u8>> {
    CardPdfRenderer::new(options.clone()).render(card)
}

/// Area in card points, measured from the card's top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
struct Area {
    x: f64,
    top: f64,
    width: f64,
    height: f64,
}

/// Renders cards to single-page PDFs
pub struct CardPdfRenderer {
    options: PdfExportOptions,
}

impl CardPdfRenderer {
    pub fn new(options: PdfExportOptions) -> Self {
        Self { options }
    }

    pub fn render(&self, card: &CardRender) -> Result<Vec<u8>> {
        let page = self.paint(card)?;
        self.write_document(page)
    }

    fn paint(&self, card: &CardRender) -> Result<PagePainter> {
        let unit = card.unit.points();
        let (outer_w, outer_h) = card.outer_size();
        let (outer_w, outer_h) = (outer_w * unit, outer_h * unit);
        if !(outer_w > 0.0 && outer_h > 0.0) {
            return Err(PdfError::InvalidDocument(format!(
                "card has no printable area ({} x {})",
                outer_w, outer_h
            )));
        }

        let (page_w, page_h) = self.options.page_size_points();
        if !(page_w > 0.0 && page_h > 0.0) {
            return Err(PdfError::InvalidDocument(format!(
                "invalid page size {} x {}",
                page_w, page_h
            )));
        }

        let scale = (page_w / outer_w).min(page_h / outer_h);
        let offset_x = (page_w - outer_w * scale) / 2.0;
        let offset_y = (page_h - outer_h * scale) / 2.0;
        debug!(scale, offset_x, offset_y, "Fitting card to page");

        let mut painter = PagePainter::new(page_w, page_h, outer_h);
        painter.content.save_state();
        painter
            .content
            .transform(scale, 0.0, 0.0, scale, offset_x, offset_y);
        painter.fill_rect(
            Area {
                x: 0.0,
                top: 0.0,
                width: outer_w,
                height: outer_h,
            },
            Color::WHITE,
        );

        let padding = card.padding * unit;
        let (box_w, box_h) = (card.width * unit, card.height * unit);
        for element in card.paint_order() {
            let rect = element.bounds.resolve(box_w, box_h);
            let area = Area {
                x: padding + rect.x,
                top: padding + rect.y,
                width: rect.width,
                height: rect.height,
            };
            painter.paint_element(element, area);
        }

        painter.content.restore_state();
        Ok(painter)
    }

    fn write_document(&self, page: PagePainter) -> Result<Vec<u8>> {
        let mut writer = PdfWriter::new(Vec::new());
        writer.set_compression(self.options.compress);
        writer.write_header()?;

        let catalog_ref = writer.allocate_object();
        let pages_ref = writer.allocate_object();
        let page_ref = writer.allocate_object();
        let content_ref = writer.allocate_object();

        let mut fonts = PdfDictionary::new();
        let mut font_objects = Vec::new();
        for (name, font) in page.fonts.iter() {
            let obj = writer.allocate_object();
            fonts.insert(name, PdfObject::Reference(obj));
            font_objects.push((obj, font));
        }

        let mut xobjects = PdfDictionary::new();
        let mut image_objects = Vec::new();
        for (name, image) in &page.images {
            let obj = writer.allocate_object();
            xobjects.insert(name.clone(), PdfObject::Reference(obj));
            image_objects.push((obj, image));
        }

        let info_ref = writer.allocate_object();

        writer.write_object(
            catalog_ref,
            &PdfDictionary::typed("Catalog")
                .with("Pages", PdfObject::Reference(pages_ref))
                .into(),
        )?;
        writer.write_object(
            pages_ref,
            &PdfDictionary::typed("Pages")
                .with("Kids", vec![PdfObject::Reference(page_ref)])
                .with("Count", 1i64)
                .into(),
        )?;

        let mut resources = PdfDictionary::new();
        if !fonts.is_empty() {
            resources.insert("Font", fonts);
        }
        if !xobjects.is_empty() {
            resources.insert("XObject", xobjects);
        }
        writer.write_object(
            page_ref,
            &PdfDictionary::typed("Page")
                .with("Parent", PdfObject::Reference(pages_ref))
                .with("MediaBox", PdfObject::rect(0.0, 0.0, page.width, page.height))
                .with("Resources", resources)
                .with("Contents", PdfObject::Reference(content_ref))
                .into(),
        )?;
        writer.write_stream_object(content_ref, PdfStream::new(page.content.into_bytes()))?;

        for (obj, font) in font_objects {
            writer.write_object(obj, &font.to_dict().into())?;
        }
        for (obj, image) in image_objects {
            writer.write_stream_object(obj, image.to_xobject())?;
        }

        writer.write_object(info_ref, &self.info_dictionary().into())?;
        writer.write_xref_and_trailer(catalog_ref, Some(info_ref))?;
        writer.finish()
    }

    fn info_dictionary(&self) -> PdfDictionary {
        let created = chrono::Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
        let mut info = PdfDictionary::new()
            .with("Producer", PdfObject::text("Cardsmith"))
            .with("CreationDate", PdfObject::text(&created));
        if let Some(title) = &self.options.title {
            info.insert("Title", PdfObject::String(pdf_text(title)));
        }
        if let Some(author) = &self.options.author {
            info.insert("Author", PdfObject::String(pdf_text(author)));
        }
        info
    }
}

/// Document info strings are PDFDocEncoding, close enough to WinAnsi for text
fn pdf_text(text: &str) -> PdfString {
    PdfString::Literal(encode_win_ansi(text))
}

/// Accumulates the page content and the resources it uses
struct PagePainter {
    width: f64,
    height: f64,
    /// Outer card height in points, for flipping top-down coordinates
    card_height: f64,
    content: ContentStream,
    fonts: FontSet,
    images: Vec<(String, JpegImage)>,
}

impl PagePainter {
    fn new(width: f64, height: f64, card_height: f64) -> Self {
        Self {
            width,
            height,
            card_height,
            content: ContentStream::new(),
            fonts: FontSet::new(),
            images: Vec::new(),
        }
    }

    /// Convert a top-down y coordinate to PDF space
    fn flip(&self, top: f64) -> f64 {
        self.card_height - top
    }

    fn paint_element(&mut self, element: &PositionedElement, area: Area) {
        let rotated = element.rotation != 0.0 && element.rotation.is_finite();
        if rotated {
            let cx = area.x + area.width / 2.0;
            let cy = self.flip(area.top + area.height / 2.0);
            // CSS rotates clockwise, PDF counter-clockwise
            self.content
                .save_state()
                .translate(cx, cy)
                .rotate(-element.rotation)
                .translate(-cx, -cy);
        }

        let label = element.label.as_ref().map(LabelBox::new);
        match &element.content {
            ElementContent::Text { text, style } => {
                self.paint_text_element(element.field_type, text, style, label.as_ref(), area)
            }
            ElementContent::Image { source, .. } => {
                self.paint_image_element(source, label.as_ref(), area)
            }
            ElementContent::Empty => {
                if let Some(label) = &label {
                    self.draw_label(label, area.x, area.top);
                }
            }
        }

        if rotated {
            self.content.restore_state();
        }
    }

    fn paint_text_element(
        &mut self,
        field_type: FieldType,
        text: &str,
        style: &TextStyle,
        label: Option<&LabelBox>,
        area: Area,
    ) {
        let size = style.font_size * PT_PER_PX;
        let dingbat = match field_type {
            FieldType::Checkbox => dingbat_code(text),
            _ => None,
        };
        let font = if dingbat.is_some() {
            StandardFont::ZapfDingbats
        } else {
            StandardFont::from_family(style.font_family.as_deref(), style.bold)
        };

        let side_label = label
            .filter(|l| matches!(l.position, LabelPosition::Left | LabelPosition::Right))
            .map(|l| l.width + LABEL_GAP)
            .unwrap_or(0.0);
        let value_width = if area.width > 0.0 {
            (area.width - side_label).max(0.0)
        } else {
            0.0
        };

        let lines = match dingbat {
            Some(_) => vec![text.to_string()],
            None => wrap_text(text, font, size, value_width),
        };
        let line_height = size * LINE_HEIGHT;
        let block_width = if value_width > 0.0 {
            value_width
        } else {
            lines
                .iter()
                .map(|line| font.text_width(line, size))
                .fold(0.0, f64::max)
        };

        let (value_x, value_top) = match label {
            Some(label) => {
                let (value_x, value_top, label_x, label_top) = match label.position {
                    LabelPosition::Top => (area.x, area.top + label.height, area.x, area.top),
                    LabelPosition::Bottom => (
                        area.x,
                        area.top,
                        area.x,
                        area.top + lines.len() as f64 * line_height,
                    ),
                    LabelPosition::Left => {
                        (area.x + label.width + LABEL_GAP, area.top, area.x, area.top)
                    }
                    LabelPosition::Right => {
                        (area.x, area.top, area.x + block_width + LABEL_GAP, area.top)
                    }
                };
                self.draw_label(label, label_x, label_top);
                (value_x, value_top)
            }
            None => (area.x, area.top),
        };

        if style.color.a == 0 {
            return;
        }
        let resource = self.fonts.resource_name(font);
        let (r, g, b) = style.color.to_unit_rgb();
        self.content.set_fill_rgb(r, g, b);
        for (i, line) in lines.iter().enumerate() {
            let encoded = match dingbat {
                Some(code) => vec![code],
                None => encode_win_ansi(line),
            };
            let line_width = font.text_width(line, size);
            let x = value_x + align_offset(style.align, block_width, line_width);
            let baseline = value_top + i as f64 * line_height + size * BASELINE;
            let y = self.flip(baseline);
            self.content
                .begin_text()
                .set_font(&resource, size)
                .move_text(x, y)
                .show_text(&encoded)
                .end_text();
        }
    }

    fn paint_image_element(&mut self, source: &ImageSource, label: Option<&LabelBox>, area: Area) {
        let jpeg = match source {
            ImageSource::Embedded {
                name,
                mime_type,
                bytes,
                ..
            } => match JpegImage::from_bytes(bytes) {
                Ok(image) => Some(image),
                Err(e) => {
                    if JpegImage::sniff(bytes) {
                        warn!(file = %name, error = %e, "Unreadable JPEG, drawing placeholder");
                    } else {
                        debug!(file = %name, mime_type = %mime_type, "Image format not embeddable, drawing placeholder");
                    }
                    None
                }
            },
            ImageSource::Url { url } => {
                debug!(url = %url, "Remote images are not fetched, drawing placeholder");
                None
            }
        };

        let mut frame = area;
        if frame.width <= 0.0 || frame.height <= 0.0 {
            let (w, h) = match &jpeg {
                Some(image) => (
                    image.width as f64 * PT_PER_PX,
                    image.height as f64 * PT_PER_PX,
                ),
                None => (PLACEHOLDER_SIZE, PLACEHOLDER_SIZE),
            };
            if frame.width <= 0.0 {
                frame.width = w;
            }
            if frame.height <= 0.0 {
                frame.height = h;
            }
        }

        if let Some(label) = label {
            let (label_x, label_top) = match label.position {
                LabelPosition::Top => {
                    frame.top += label.height;
                    frame.height -= label.height;
                    (area.x, area.top)
                }
                LabelPosition::Bottom => {
                    frame.height -= label.height;
                    (area.x, frame.top + frame.height)
                }
                LabelPosition::Left => {
                    frame.x += label.width + LABEL_GAP;
                    frame.width -= label.width + LABEL_GAP;
                    (area.x, area.top)
                }
                LabelPosition::Right => {
                    frame.width -= label.width + LABEL_GAP;
                    (frame.x + frame.width + LABEL_GAP, area.top)
                }
            };
            self.draw_label(label, label_x, label_top);
        }
        if frame.width <= 0.0 || frame.height <= 0.0 {
            return;
        }

        match jpeg {
            Some(image) => self.draw_image(image, frame),
            None => self.draw_placeholder(frame),
        }
    }

    /// Draw an image scaled down to fit the frame, centred
    fn draw_image(&mut self, image: JpegImage, frame: Area) {
        let natural_w = image.width as f64 * PT_PER_PX;
        let natural_h = image.height as f64 * PT_PER_PX;
        let fit = (frame.width / natural_w).min(frame.height / natural_h).min(1.0);
        let (w, h) = (natural_w * fit, natural_h * fit);
        let x = frame.x + (frame.width - w) / 2.0;
        let y = self.flip(frame.top + (frame.height + h) / 2.0);

        let name = format!("Im{}", self.images.len() + 1);
        self.images.push((name.clone(), image));
        self.content
            .save_state()
            .transform(w, 0.0, 0.0, h, x, y)
            .draw_xobject(&name)
            .restore_state();
    }

    /// A framed box with both diagonals
    fn draw_placeholder(&mut self, frame: Area) {
        let (r, g, b) = PLACEHOLDER_GRAY.to_unit_rgb();
        let left = frame.x;
        let right = frame.x + frame.width;
        let top = self.flip(frame.top);
        let bottom = self.flip(frame.top + frame.height);
        self.content
            .save_state()
            .set_stroke_rgb(r, g, b)
            .set_line_width(0.5)
            .rect(left, bottom, frame.width, frame.height)
            .stroke()
            .move_to(left, bottom)
            .line_to(right, top)
            .move_to(left, top)
            .line_to(right, bottom)
            .stroke()
            .restore_state();
    }

    fn draw_label(&mut self, label: &LabelBox, x: f64, top: f64) {
        if label.color.a == 0 {
            return;
        }
        let resource = self.fonts.resource_name(label.font);
        let (r, g, b) = label.color.to_unit_rgb();
        let y = self.flip(top + label.size * BASELINE);
        self.content
            .set_fill_rgb(r, g, b)
            .begin_text()
            .set_font(&resource, label.size)
            .move_text(x, y)
            .show_text(&encode_win_ansi(&label.text))
            .end_text();
    }

    fn fill_rect(&mut self, area: Area, color: Color) {
        let (r, g, b) = color.to_unit_rgb();
        let bottom = self.flip(area.top + area.height);
        self.content
            .set_fill_rgb(r, g, b)
            .rect(area.x, bottom, area.width, area.height)
            .fill();
    }
}

/// A label measured in points
struct LabelBox {
    text: String,
    size: f64,
    width: f64,
    height: f64,
    color: Color,
    position: LabelPosition,
    font: StandardFont,
}

impl LabelBox {
    fn new(label: &ElementLabel) -> Self {
        let font = StandardFont::fallback(false);
        let size = label.font_size * PT_PER_PX;
        Self {
            width: font.text_width(&label.text, size),
            height: size * LINE_HEIGHT,
            text: label.text.clone(),
            size,
            color: label.color,
            position: label.position,
            font,
        }
    }
}

fn align_offset(align: TextAlign, block_width: f64, line_width: f64) -> f64 {
    let slack = (block_width - line_width).max(0.0);
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Center => slack / 2.0,
        TextAlign::Right => slack,
    }
}

/// Split text into lines: explicit newlines first, then greedy word wrap
/// when a width is given
fn wrap_text(text: &str, font: StandardFont, size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if max_width <= 0.0 {
            lines.push(paragraph.to_string());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split(' ') {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if current.is_empty() || font.text_width(&candidate, size) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}
