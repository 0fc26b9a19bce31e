//! Image XObjects
//!
//! JPEG uploads are passed through untouched with `/DCTDecode`. Other formats
//! are not decoded; the painter draws a placeholder frame for them.

use super::objects::{PdfDictionary, PdfObject, PdfStream};
use thiserror::Error;

/// Errors reading image data
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("Invalid image format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported image: {0}")]
    Unsupported(String),
}

/// Colour space of an embedded image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRGB,
    DeviceCMYK,
}

impl ColorSpace {
    fn from_components(components: u8) -> Result<Self, ImageError> {
        match components {
            1 => Ok(ColorSpace::DeviceGray),
            3 => Ok(ColorSpace::DeviceRGB),
            4 => Ok(ColorSpace::DeviceCMYK),
            n => Err(ImageError::Unsupported(format!("{} colour components", n))),
        }
    }

    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
        }
    }
}

/// A JPEG ready to embed
#[derive(Debug, Clone, PartialEq)]
pub struct JpegImage {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    data: Vec<u8>,
}

impl JpegImage {
    /// Read the frame header of a JPEG file
    pub fn from_bytes(data: &[u8]) -> Result<Self, ImageError> {
        let frame = parse_frame_header(data)?;
        Ok(Self {
            width: frame.width,
            height: frame.height,
            color_space: ColorSpace::from_components(frame.components)?,
            data: data.to_vec(),
        })
    }

    /// Whether the bytes start with the JPEG SOI marker
    pub fn sniff(data: &[u8]) -> bool {
        data.starts_with(&[0xFF, 0xD8, 0xFF])
    }

    /// Image XObject stream
    pub fn to_xobject(&self) -> PdfStream {
        let mut dict = PdfDictionary::typed("XObject")
            .with("Subtype", PdfObject::name("Image"))
            .with("Width", self.width)
            .with("Height", self.height)
            .with("BitsPerComponent", 8i64)
            .with("ColorSpace", PdfObject::name(self.color_space.pdf_name()));
        if self.color_space == ColorSpace::DeviceCMYK {
            // Adobe CMYK JPEGs are stored inverted
            dict.insert(
                "Decode",
                PdfObject::Array(
                    [1i64, 0, 1, 0, 1, 0, 1, 0]
                        .into_iter()
                        .map(PdfObject::Integer)
                        .collect(),
                ),
            );
        }
        PdfStream::new(self.data.clone())
            .with_dict(dict)
            .encoded_with("DCTDecode")
    }
}

struct FrameHeader {
    width: u32,
    height: u32,
    components: u8,
}

/// Walk the marker segments up to the first start-of-frame
fn parse_frame_header(data: &[u8]) -> Result<FrameHeader, ImageError> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(ImageError::InvalidFormat("not a JPEG file".to_string()));
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            return Err(ImageError::InvalidFormat("invalid JPEG marker".to_string()));
        }
        // Fill bytes
        while pos + 1 < data.len() && data[pos + 1] == 0xFF {
            pos += 1;
        }
        if pos + 1 >= data.len() {
            break;
        }
        let marker = data[pos + 1];
        pos += 2;

        if marker == 0xD8 || marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            continue;
        }
        if marker == 0xD9 || marker == 0xDA {
            break;
        }
        if pos + 2 > data.len() {
            break;
        }
        let length = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;

        let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            if pos + 8 > data.len() {
                break;
            }
            let height = u16::from_be_bytes([data[pos + 3], data[pos + 4]]) as u32;
            let width = u16::from_be_bytes([data[pos + 5], data[pos + 6]]) as u32;
            let components = data[pos + 7];
            if width == 0 || height == 0 {
                return Err(ImageError::InvalidFormat("zero image dimension".to_string()));
            }
            return Ok(FrameHeader {
                width,
                height,
                components,
            });
        }
        pos += length;
    }

    Err(ImageError::InvalidFormat(
        "no frame header found in JPEG".to_string(),
    ))
}
