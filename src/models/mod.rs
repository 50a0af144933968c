//! Shared types used across all modules.
//!
//! Attendee records, the username-keyed table they are assembled into,
//! forum groups, and API credentials. Other modules import from here
//! rather than reaching into each other's internals.

pub mod attendee;
pub mod credentials;
pub mod group;

pub use attendee::{AttendeeRecord, AttendeeTable, Column};
pub use credentials::Credentials;
pub use group::Group;
