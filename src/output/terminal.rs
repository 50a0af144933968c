//! Terminal renderer: one styled block per attendee.

use colored::Colorize;

use crate::models::{AttendeeTable, Column};
use crate::output::OutputRenderer;

/// Terminal output renderer with colored, flowing text.
pub struct TerminalRenderer;

impl OutputRenderer for TerminalRenderer {
    fn render(&self, table: &AttendeeTable) -> String {
        if table.is_empty() {
            return format!("{}", "  No attendees.\n".dimmed());
        }

        let columns = table.columns();
        let width = columns
            .iter()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or_default();

        let mut output = String::new();
        for record in table {
            let heading = if record.name.is_empty() {
                record.username.bold().to_string()
            } else {
                format!("{} {}", record.username.bold(), format!("({})", record.name).dimmed())
            };
            output.push_str(&format!(" {} {}\n", "●".cyan(), heading));

            for column in columns.iter().filter(|c| **c != Column::Name) {
                let value = record.get(*column).unwrap_or_default();
                if value.is_empty() {
                    continue;
                }
                let label = format!("{:<width$}", column.to_string());
                output.push_str(&format!("   {}  {}\n", label.dimmed(), value));
            }
            output.push('\n');
        }

        output.push_str(&format!("{}\n", "───────────────────────────────────".dimmed()));
        output.push_str(&format!(
            " {} {}\n",
            table.len().to_string().bold(),
            if table.len() == 1 { "attendee" } else { "attendees" }
        ));
        output
    }
}
