//! JSON output renderer.
//!
//! Outputs an array of attendee objects in table order.

use crate::models::AttendeeTable;
use crate::output::OutputRenderer;

/// JSON output renderer.
pub struct JsonRenderer;

impl OutputRenderer for JsonRenderer {
    fn render(&self, table: &AttendeeTable) -> String {
        let rows: Vec<_> = table.iter().collect();
        serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendeeRecord;

    fn record(username: &str, email: Option<&str>) -> AttendeeRecord {
        AttendeeRecord {
            username: username.into(),
            name: "Tom Brown".into(),
            location: String::new(),
            website: "https://www.nworbmot.org/".into(),
            bio: String::new(),
            affiliation: String::new(),
            avatar_url: format!("https://forum.example.org/user_avatar/{username}/240/1.png"),
            email: email.map(str::to_string),
        }
    }

    #[test]
    fn render_json() {
        let table: AttendeeTable = vec![
            record("tom_brown", Some("tom@example.org")),
            record("wolf", None),
        ]
        .into_iter()
        .collect();

        let output = JsonRenderer.render(&table);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        let rows = parsed.as_array().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["username"], "tom_brown");
        assert_eq!(rows[0]["email"], "tom@example.org");
        assert_eq!(rows[1]["username"], "wolf");
        assert!(rows[1].get("email").is_none());
    }

    #[test]
    fn render_empty_json() {
        let output = JsonRenderer.render(&AttendeeTable::default());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed.as_array().unwrap().is_empty());
    }
}
