//! Render Model - Template and card data to preview conversion
//!
//! This crate turns a template plus card data into a tree of positioned
//! elements that a front end or the PDF exporter can draw, and provides the
//! helpers used by template previews.

mod card_render;
mod error;
mod preview;
mod sample;
mod style;

pub use card_render::*;
pub use error::*;
pub use preview::*;
pub use sample::*;
pub use style::*;
