//! Template interchange and persistence
//!
//! - `interchange`: JSON export and validated import
//! - `files`: reading and writing template files
//! - `catalog`: the template list kept in a key-value store

mod catalog;
mod error;
mod files;
mod interchange;

pub use catalog::*;
pub use error::*;
pub use files::*;
pub use interchange::*;
