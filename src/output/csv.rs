//! CSV output renderer.
//!
//! One header row (`username` followed by the table's columns) and one
//! row per attendee. Fields are quoted per RFC 4180 when they contain a
//! comma, a quote, or a line break.

use crate::models::AttendeeTable;
use crate::output::OutputRenderer;

/// CSV output renderer.
pub struct CsvRenderer;

impl OutputRenderer for CsvRenderer {
    fn render(&self, table: &AttendeeTable) -> String {
        let columns = table.columns();

        let mut header = vec!["username".to_string()];
        header.extend(columns.iter().map(ToString::to_string));

        let mut output = join_row(header.iter().map(String::as_str));
        for record in table {
            let cells = std::iter::once(record.username.as_str())
                .chain(columns.iter().map(|c| record.get(*c).unwrap_or_default()));
            output.push_str(&join_row(cells));
        }
        output
    }
}

fn join_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = cells.map(escape_field).collect::<Vec<_>>().join(",");
    line.push_str("\r\n");
    line
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
