//! PDF object model and serialization
//!
//! A card PDF needs only a handful of object kinds: numbers, names, strings,
//! arrays, dictionaries, streams and indirect references.

use std::collections::BTreeMap;
use std::io::{self, Write};

/// A PDF object
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(PdfString),
    Name(String),
    Array(Vec<PdfObject>),
    Dictionary(PdfDictionary),
    Stream(PdfStream),
    /// Indirect reference to an object number (generation is always 0)
    Reference(u32),
}

impl PdfObject {
    pub fn name(name: impl Into<String>) -> Self {
        PdfObject::Name(name.into())
    }

    /// A literal text string (document info entries)
    pub fn text(text: &str) -> Self {
        PdfObject::String(PdfString::Literal(text.as_bytes().to_vec()))
    }

    /// A rectangle array `[x0 y0 x1 y1]`
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        PdfObject::Array(vec![
            PdfObject::Real(x0),
            PdfObject::Real(y0),
            PdfObject::Real(x1),
            PdfObject::Real(y1),
        ])
    }
}

impl From<i64> for PdfObject {
    fn from(n: i64) -> Self {
        PdfObject::Integer(n)
    }
}

impl From<u32> for PdfObject {
    fn from(n: u32) -> Self {
        PdfObject::Integer(n as i64)
    }
}

impl From<f64> for PdfObject {
    fn from(n: f64) -> Self {
        PdfObject::Real(n)
    }
}

impl From<PdfDictionary> for PdfObject {
    fn from(dict: PdfDictionary) -> Self {
        PdfObject::Dictionary(dict)
    }
}

impl From<Vec<PdfObject>> for PdfObject {
    fn from(items: Vec<PdfObject>) -> Self {
        PdfObject::Array(items)
    }
}

/// String encodings
#[derive(Debug, Clone, PartialEq)]
pub enum PdfString {
    /// `(...)` with escapes
    Literal(Vec<u8>),
    /// `<...>`
    Hex(Vec<u8>),
}

/// Dictionary with deterministic key order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfDictionary {
    entries: BTreeMap<String, PdfObject>,
}

impl PdfDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a dictionary with a `/Type` entry
    pub fn typed(type_name: &str) -> Self {
        Self::new().with("Type", PdfObject::name(type_name))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PdfObject>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Insert (builder style)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PdfObject>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PdfObject)> {
        self.entries.iter()
    }
}

/// A stream: dictionary plus raw bytes
#[derive(Debug, Clone, PartialEq)]
pub struct PdfStream {
    pub dict: PdfDictionary,
    pub data: Vec<u8>,
    /// Data already carries a filter and must not be compressed again
    pub encoded: bool,
}

impl PdfStream {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            dict: PdfDictionary::new(),
            data,
            encoded: false,
        }
    }

    pub fn with_dict(mut self, dict: PdfDictionary) -> Self {
        self.dict = dict;
        self
    }

    /// Mark the data as already encoded with `filter`
    pub fn encoded_with(mut self, filter: &str) -> Self {
        self.dict.insert("Filter", PdfObject::name(filter));
        self.encoded = true;
        self
    }
}

/// Writes objects in PDF syntax
pub struct PdfSerializer<W: Write> {
    writer: W,
}

impl<W: Write> PdfSerializer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_object(&mut self, obj: &PdfObject) -> io::Result<()> {
        match obj {
            PdfObject::Null => self.writer.write_all(b"null"),
            PdfObject::Boolean(b) => write!(self.writer, "{}", b),
            PdfObject::Integer(n) => write!(self.writer, "{}", n),
            PdfObject::Real(n) => self.writer.write_all(format_real(*n).as_bytes()),
            PdfObject::String(s) => self.write_string(s),
            PdfObject::Name(name) => self.write_name(name),
            PdfObject::Array(items) => {
                self.writer.write_all(b"[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.writer.write_all(b" ")?;
                    }
                    self.write_object(item)?;
                }
                self.writer.write_all(b"]")
            }
            PdfObject::Dictionary(dict) => self.write_dictionary(dict),
            PdfObject::Stream(stream) => {
                self.write_dictionary(&stream.dict)?;
                self.writer.write_all(b"\nstream\n")?;
                self.writer.write_all(&stream.data)?;
                self.writer.write_all(b"\nendstream")
            }
            PdfObject::Reference(num) => write!(self.writer, "{} 0 R", num),
        }
    }

    fn write_string(&mut self, s: &PdfString) -> io::Result<()> {
        match s {
            PdfString::Literal(data) => {
                let mut out = Vec::with_capacity(data.len() + 2);
                out.push(b'(');
                escape_literal(data, &mut out);
                out.push(b')');
                self.writer.write_all(&out)
            }
            PdfString::Hex(data) => {
                self.writer.write_all(b"<")?;
                for byte in data {
                    write!(self.writer, "{:02X}", byte)?;
                }
                self.writer.write_all(b">")
            }
        }
    }

    fn write_name(&mut self, name: &str) -> io::Result<()> {
        self.writer.write_all(b"/")?;
        for byte in name.bytes() {
            let delimiter = matches!(
                byte,
                b'#' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
            );
            if (0x21..=0x7E).contains(&byte) && !delimiter {
                self.writer.write_all(&[byte])?;
            } else {
                write!(self.writer, "#{:02X}", byte)?;
            }
        }
        Ok(())
    }

    fn write_dictionary(&mut self, dict: &PdfDictionary) -> io::Result<()> {
        self.writer.write_all(b"<<")?;
        for (key, value) in dict.iter() {
            self.writer.write_all(b" ")?;
            self.write_name(key)?;
            self.writer.write_all(b" ")?;
            self.write_object(value)?;
        }
        self.writer.write_all(b" >>")
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Serialize one object to bytes
pub fn to_bytes(obj: &PdfObject) -> io::Result<Vec<u8>> {
    let mut serializer = PdfSerializer::new(Vec::new());
    serializer.write_object(obj)?;
    Ok(serializer.into_inner())
}

/// Format a number the way content streams and objects expect: no exponent,
/// at most four decimals, no trailing zeros
pub fn format_real(n: f64) -> String {
    if !n.is_finite() {
        return "0".to_string();
    }
    let s = format!("{:.4}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        _ => s.to_string(),
    }
}

/// Escape bytes for a literal string body
pub fn escape_literal(data: &[u8], out: &mut Vec<u8>) {
    for &byte in data {
        match byte {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(byte);
            }
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            0x20..=0x7E => out.push(byte),
            _ => out.extend_from_slice(format!("\\{:03o}", byte).as_bytes()),
        }
    }
}
