//! Card Model - Card templates, fields and card data
//!
//! This crate provides the data model shared by the editor, the form engine,
//! the preview renderer and the store: templates with their physical settings,
//! typed and positioned fields, the values a filled-in card carries, and the
//! template validator.

mod data;
mod error;
mod field;
mod ids;
mod registry;
mod samples;
mod template;
mod validation;

pub use data::*;
pub use error::*;
pub use field::*;
pub use ids::*;
pub use registry::*;
pub use samples::*;
pub use template::*;
pub use validation::*;
