//! PDF export for filled-in cards
//!
//! - `objects`: PDF object model and serialization
//! - `content`: content stream operators
//! - `fonts`: standard 14 fonts and WinAnsi text encoding
//! - `images`: JPEG image XObjects
//! - `writer`: file structure, xref table and stream compression
//! - `options`: page size and document metadata
//! - `renderer`: paints a card preview onto a page

mod content;
mod fonts;
mod images;
mod objects;
mod options;
mod renderer;
mod writer;

pub use content::ContentStream;
pub use fonts::StandardFont;
pub use images::{ImageError, JpegImage};
pub use options::*;
pub use renderer::{render_card_pdf, CardPdfRenderer};
pub use writer::{PdfError, PdfWriter};
