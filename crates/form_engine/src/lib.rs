//! Form Engine - Dynamic forms generated from card templates
//!
//! A template's fields are turned into per-field validation rules, initial
//! values and form controls. `FormState` tracks the values being edited, which
//! fields have been touched, and the current validation errors.

mod controls;
mod error;
mod rules;
mod schema;
mod state;

pub use controls::*;
pub use error::*;
pub use rules::*;
pub use schema::*;
pub use state::*;
