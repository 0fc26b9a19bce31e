//! Content stream builder
//!
//! Operators used when painting a card:
//! - `q`/`Q` save and restore graphics state, `cm` transform
//! - `rg`/`RG` fill and stroke colour, `w` line width
//! - `re`, `m`, `l`, `f`, `S` paths
//! - `BT`/`ET`, `Tf`, `Td`, `Tj` text
//! - `Do` XObject (images)

use super::objects::{escape_literal, format_real};
use std::fmt::Write as _;

/// Accumulates content stream operators
#[derive(Debug, Default)]
pub struct ContentStream {
    data: String,
    /// Raw bytes of text strings are kept separately per `Tj` call
    bytes: Vec<u8>,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        self.flush();
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.bytes.is_empty()
    }

    fn flush(&mut self) {
        self.bytes.extend_from_slice(self.data.as_bytes());
        self.data.clear();
    }

    fn op(&mut self, operands: &[f64], operator: &str) -> &mut Self {
        for operand in operands {
            self.data.push_str(&format_real(*operand));
            self.data.push(' ');
        }
        self.data.push_str(operator);
        self.data.push('\n');
        self
    }

    // =========================================================================
    // Graphics state
    // =========================================================================

    pub fn save_state(&mut self) -> &mut Self {
        self.op(&[], "q")
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.op(&[], "Q")
    }

    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        self.op(&[a, b, c, d, e, f], "cm")
    }

    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        self.transform(1.0, 0.0, 0.0, 1.0, x, y)
    }

    /// Counter-clockwise rotation in degrees
    pub fn rotate(&mut self, degrees: f64) -> &mut Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        self.transform(cos, sin, -sin, cos, 0.0, 0.0)
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.op(&[width], "w")
    }

    // =========================================================================
    // Colour
    // =========================================================================

    pub fn set_fill_rgb(&mut self, r: f64, g: f64, b: f64) -> &mut Self {
        self.op(&[r, g, b], "rg")
    }

    pub fn set_stroke_rgb(&mut self, r: f64, g: f64, b: f64) -> &mut Self {
        self.op(&[r, g, b], "RG")
    }

    // =========================================================================
    // Paths
    // =========================================================================

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.op(&[x, y, width, height], "re")
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(&[x, y], "m")
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(&[x, y], "l")
    }

    pub fn fill(&mut self) -> &mut Self {
        self.op(&[], "f")
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.op(&[], "S")
    }

    // =========================================================================
    // Text
    // =========================================================================

    pub fn begin_text(&mut self) -> &mut Self {
        self.op(&[], "BT")
    }

    pub fn end_text(&mut self) -> &mut Self {
        self.op(&[], "ET")
    }

    pub fn set_font(&mut self, resource_name: &str, size: f64) -> &mut Self {
        let _ = write!(self.data, "/{} ", resource_name);
        self.op(&[size], "Tf")
    }

    pub fn move_text(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(&[x, y], "Td")
    }

    /// Show already-encoded single-byte text
    pub fn show_text(&mut self, encoded: &[u8]) -> &mut Self {
        self.flush();
        self.bytes.push(b'(');
        escape_literal(encoded, &mut self.bytes);
        self.bytes.extend_from_slice(b") Tj\n");
        self
    }

    // =========================================================================
    // XObjects
    // =========================================================================

    pub fn draw_xobject(&mut self, resource_name: &str) -> &mut Self {
        let _ = writeln!(self.data, "/{} Do", resource_name);
        self
    }
}
