//! PDF file writer
//!
//! Handles object numbering, the cross-reference table, the trailer and
//! Flate compression of streams.

use super::objects::{to_bytes, PdfDictionary, PdfObject, PdfStream};
use super::ImageError;
use std::io::{self, Write};
use thiserror::Error;

/// Errors producing a PDF
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// PDF header version
pub const PDF_VERSION: &str = "1.4";

/// Writes indirect objects to an output and tracks their offsets
pub struct PdfWriter<W: Write> {
    writer: W,
    position: u64,
    /// `(object number, byte offset)` of every object written
    offsets: Vec<(u32, u64)>,
    next_obj_num: u32,
    compress: bool,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            position: 0,
            offsets: Vec::new(),
            next_obj_num: 1,
            compress: true,
        }
    }

    pub fn set_compression(&mut self, compress: bool) {
        self.compress = compress;
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.position += data.len() as u64;
        Ok(())
    }

    /// Reserve the next object number
    pub fn allocate_object(&mut self) -> u32 {
        let num = self.next_obj_num;
        self.next_obj_num += 1;
        num
    }

    pub fn write_header(&mut self) -> Result<()> {
        self.write_bytes(format!("%PDF-{}\n", PDF_VERSION).as_bytes())?;
        // Binary marker so transfer tools treat the file as binary
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])
    }

    pub fn write_object(&mut self, obj_num: u32, object: &PdfObject) -> Result<()> {
        if obj_num == 0 || obj_num >= self.next_obj_num {
            return Err(PdfError::InvalidDocument(format!(
                "object {} was never allocated",
                obj_num
            )));
        }
        if self.offsets.iter().any(|(num, _)| *num == obj_num) {
            return Err(PdfError::InvalidDocument(format!(
                "object {} written twice",
                obj_num
            )));
        }

        self.offsets.push((obj_num, self.position));
        self.write_bytes(format!("{} 0 obj\n", obj_num).as_bytes())?;
        let body = to_bytes(object)?;
        self.write_bytes(&body)?;
        self.write_bytes(b"\nendobj\n")
    }

    /// Write a stream object, compressing it unless it is already encoded
    pub fn write_stream_object(&mut self, obj_num: u32, mut stream: PdfStream) -> Result<()> {
        if self.compress && !stream.encoded {
            stream = deflate(stream)?;
        }
        stream.dict.insert("Length", stream.data.len() as i64);
        self.write_object(obj_num, &PdfObject::Stream(stream))
    }

    /// Write the xref table, trailer and end-of-file marker
    pub fn write_xref_and_trailer(&mut self, catalog: u32, info: Option<u32>) -> Result<()> {
        let xref_offset = self.position;
        let mut offsets = self.offsets.clone();
        offsets.sort_by_key(|(num, _)| *num);

        let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", self.next_obj_num);
        let mut expected = 1u32;
        for (num, offset) in offsets {
            while expected < num {
                table.push_str("0000000000 65535 f \n");
                expected += 1;
            }
            table.push_str(&format!("{:010} 00000 n \n", offset));
            expected = num + 1;
        }
        while expected < self.next_obj_num {
            table.push_str("0000000000 65535 f \n");
            expected += 1;
        }
        self.write_bytes(table.as_bytes())?;

        let mut trailer = PdfDictionary::new()
            .with("Size", self.next_obj_num)
            .with("Root", PdfObject::Reference(catalog));
        if let Some(info) = info {
            trailer.insert("Info", PdfObject::Reference(info));
        }
        self.write_bytes(b"trailer\n")?;
        let trailer = to_bytes(&trailer.into())?;
        self.write_bytes(&trailer)?;
        self.write_bytes(format!("\nstartxref\n{}\n%%EOF\n", xref_offset).as_bytes())
    }

    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

fn deflate(mut stream: PdfStream) -> Result<PdfStream> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&stream.data)?;
    stream.data = encoder.finish()?;
    Ok(stream.encoded_with("FlateDecode"))
}
