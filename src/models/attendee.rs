//! Attendee records and the username-keyed table they are assembled into.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Profile data for one forum user.
///
/// Text fields are empty strings when the forum has no value for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeRecord {
    pub username: String,
    pub name: String,
    pub location: String,
    pub website: String,
    pub bio: String,
    pub affiliation: String,
    pub avatar_url: String,
    /// Only populated when email retrieval was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AttendeeRecord {
    /// Value of a single column. `None` only for an unrequested email.
    pub fn get(&self, column: Column) -> Option<&str> {
        match column {
            Column::Name => Some(&self.name),
            Column::Location => Some(&self.location),
            Column::Website => Some(&self.website),
            Column::Bio => Some(&self.bio),
            Column::Affiliation => Some(&self.affiliation),
            Column::AvatarUrl => Some(&self.avatar_url),
            Column::Email => self.email.as_deref(),
        }
    }
}

/// Columns of an [`AttendeeTable`], in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Location,
    Website,
    Bio,
    Affiliation,
    AvatarUrl,
    Email,
}

impl Column {
    /// Every column, email last.
    pub const ALL: [Column; 7] = [
        Column::Name,
        Column::Location,
        Column::Website,
        Column::Bio,
        Column::Affiliation,
        Column::AvatarUrl,
        Column::Email,
    ];

    /// Columns filled from the public profile alone.
    pub const PROFILE: [Column; 6] = [
        Column::Name,
        Column::Location,
        Column::Website,
        Column::Bio,
        Column::Affiliation,
        Column::AvatarUrl,
    ];
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Name => write!(f, "name"),
            Column::Location => write!(f, "location"),
            Column::Website => write!(f, "website"),
            Column::Bio => write!(f, "bio"),
            Column::Affiliation => write!(f, "affiliation"),
            Column::AvatarUrl => write!(f, "avatar_url"),
            Column::Email => write!(f, "email"),
        }
    }
}

impl std::str::FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(Column::Name),
            "location" => Ok(Column::Location),
            "website" => Ok(Column::Website),
            "bio" => Ok(Column::Bio),
            "affiliation" => Ok(Column::Affiliation),
            "avatar_url" | "avatar" => Ok(Column::AvatarUrl),
            "email" => Ok(Column::Email),
            other => Err(format!(
                "unknown column: '{other}'. Supported: name, location, website, bio, \
                 affiliation, avatar_url, email"
            )),
        }
    }
}

/// Attendee records indexed by username, in the order they were requested.
///
/// Read-only once handed out: rows are added by the fetcher (or by
/// collecting records), and a username already present is never replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttendeeTable {
    rows: IndexMap<String, AttendeeRecord>,
}

impl AttendeeTable {
    /// Add a row keyed by the record's username. Returns `false` and
    /// leaves the table unchanged when that username already has a row.
    pub(crate) fn insert(&mut self, record: AttendeeRecord) -> bool {
        if self.rows.contains_key(&record.username) {
            return false;
        }
        self.rows.insert(record.username.clone(), record);
        true
    }

    /// Usernames in row order.
    pub fn index(&self) -> Vec<&str> {
        self.rows.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.rows.contains_key(username)
    }

    pub fn get(&self, username: &str) -> Option<&AttendeeRecord> {
        self.rows.get(username)
    }

    /// Single cell lookup, the `table[username][column]` of the table.
    pub fn field(&self, username: &str, column: Column) -> Option<&str> {
        self.rows.get(username).and_then(|r| r.get(column))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttendeeRecord> {
        self.rows.values()
    }

    /// Columns present in this table: the profile columns, plus `email`
    /// when any row carries one.
    pub fn columns(&self) -> Vec<Column> {
        if self.rows.values().any(|r| r.email.is_some()) {
            Column::ALL.to_vec()
        } else {
            Column::PROFILE.to_vec()
        }
    }
}

impl FromIterator<AttendeeRecord> for AttendeeTable {
    fn from_iter<I: IntoIterator<Item = AttendeeRecord>>(iter: I) -> Self {
        let mut table = Self::default();
        for record in iter {
            table.insert(record);
        }
        table
    }
}

impl<'a> IntoIterator for &'a AttendeeTable {
    type Item = &'a AttendeeRecord;
    type IntoIter = indexmap::map::Values<'a, String, AttendeeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.values()
    }
}
