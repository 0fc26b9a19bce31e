//! Store - Card storage, PDF export, template interchange and settings
//!
//! This crate persists everything the application keeps between sessions:
//! exported card PDFs and their manifest, the template catalog, template
//! files and application settings. Persistence goes through the
//! [`KeyValueStore`] trait with in-memory and directory-backed stores.

mod cards;
mod error;
mod file_io;
mod kv;
mod settings;
pub mod pdf;
pub mod templates;

pub use cards::*;
pub use error::*;
pub use file_io::*;
pub use kv::*;
pub use settings::*;

pub use pdf::{render_card_pdf, PdfError, PdfExportOptions};
pub use templates::{
    export_template, import_template, load_template_file, load_template_file_sync,
    save_template_file, save_template_file_sync, template_file_path, TemplateCatalog,
    TemplateError, TemplateResult, TEMPLATES_KEY, TEMPLATE_EXTENSION,
};
