//! Cardsmith - Card template editor and card exporter
//!
//! The application layer: [`CardApp`] holds the template list, the selected
//! template and whether it is shown in the layout editor or the card form,
//! plus the card store and settings. The `*_commands` modules expose it to a
//! front end as commands taking and returning camelCase DTOs, with errors
//! reported as strings.

mod error;
mod logging;
mod state;

pub mod card_commands;
pub mod editor_commands;
pub mod form_commands;
pub mod settings_commands;
pub mod template_commands;

pub use error::*;
pub use logging::*;
pub use state::*;
