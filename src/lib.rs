//! Forum attendee lookup: username checks, group membership and profile details.
//!
//! Fetches attendee profiles from a Discourse forum, validates usernames
//! against the forum's naming rules and resolves group membership.
//! Re-exports public modules for integration tests and external use.

pub mod api;
pub mod attendees;
pub mod config;
pub mod constants;
pub mod env;
pub mod groups;
pub mod logging;
pub mod models;
pub mod output;
pub mod pagination;
pub mod validate;

pub use api::{DiscourseClient, ForumApi, ForumError, PrivilegedScope};
pub use attendees::{attendee_list, AttendeeQuery};
pub use groups::{group_members, resolve_group_id};
pub use models::{AttendeeRecord, AttendeeTable, Column, Credentials, Group};
pub use validate::{check_usernames, UsernamePolicy};
