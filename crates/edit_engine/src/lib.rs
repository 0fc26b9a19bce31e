//! Edit Engine - Layout editing for card templates
//!
//! This crate provides the template layout editor: grid and zoom state,
//! snapping, drag/drop placement and resizing of fields, the field and
//! settings dialogs, and snapshot-based undo/redo.

mod command;
mod dialogs;
mod editor;
mod error;
mod geometry;
mod grid;
mod undo;

pub use command::*;
pub use dialogs::*;
pub use editor::*;
pub use error::*;
pub use geometry::*;
pub use grid::*;
pub use undo::*;
