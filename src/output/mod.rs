//! Output renderers: terminal, JSON, CSV.

pub mod csv;
pub mod json;
pub mod terminal;

use crate::models::AttendeeTable;

/// Trait for rendering an attendee table to an output format.
pub trait OutputRenderer {
    /// Render the table to a string.
    fn render(&self, table: &AttendeeTable) -> String;
}
