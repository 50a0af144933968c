//! ForumApi trait and the remote forum integration.
//!
//! Provides an abstraction layer over the forum's HTTP endpoints so the
//! lookup logic can be driven by the Discourse client in production and
//! by an in-memory fake in tests.

pub mod discourse;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AttendeeRecord, Credentials, Group};
use crate::pagination::Page;

pub use discourse::DiscourseClient;

/// The privileged field or operation an authorization failure applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivilegedScope {
    /// The email address of one user.
    Email { username: String },
    /// The group listing.
    Groups,
    /// The member listing of one group.
    GroupMembers { group: String },
}

impl fmt::Display for PrivilegedScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivilegedScope::Email { username } => write!(f, "email of user '{username}'"),
            PrivilegedScope::Groups => write!(f, "group listing"),
            PrivilegedScope::GroupMembers { group } => write!(f, "members of group '{group}'"),
        }
    }
}

/// Errors from forum lookups.
#[derive(Error, Debug)]
pub enum ForumError {
    #[error("no group named '{name}'")]
    GroupNotFound { name: String },

    #[error("user '{username}' does not exist")]
    UserNotFound { username: String },

    #[error("not authorized to read {scope}: valid api_username and api_key required")]
    Authorization { scope: PrivilegedScope },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("{url} returned HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("failed to decode forum response: {0}")]
    Decode(String),

    #[error("invalid forum URL: {0}")]
    InvalidBaseUrl(String),
}

impl ForumError {
    pub fn email_unauthorized(username: &str) -> Self {
        ForumError::Authorization {
            scope: PrivilegedScope::Email {
                username: username.to_string(),
            },
        }
    }
}

/// Read access to the forum endpoints the lookups need.
///
/// Each method issues exactly one request. Paged listings take an opaque
/// cursor (start with `0`) and report the cursor of the following page.
#[async_trait]
pub trait ForumApi: Send + Sync {
    /// Public profile of `username`. The returned record never carries an
    /// email.
    async fn user_profile(&self, username: &str) -> Result<AttendeeRecord, ForumError>;

    /// Primary email address of `username` (privileged).
    async fn user_email(
        &self,
        username: &str,
        credentials: &Credentials,
    ) -> Result<String, ForumError>;

    /// One page of the group listing.
    async fn groups_page(
        &self,
        cursor: u64,
        credentials: &Credentials,
    ) -> Result<Page<Group>, ForumError>;

    /// One page of the usernames belonging to group `group_id`.
    async fn group_members_page(
        &self,
        group_id: u64,
        cursor: u64,
        credentials: &Credentials,
    ) -> Result<Page<String>, ForumError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_offending_entity() {
        let err = ForumError::UserNotFound {
            username: "ghost".into(),
        };
        assert_eq!(err.to_string(), "user 'ghost' does not exist");

        let err = ForumError::GroupNotFound {
            name: "asdasd231234".into(),
        };
        assert!(err.to_string().contains("asdasd231234"));
    }

    #[test]
    fn authorization_error_is_scoped() {
        let err = ForumError::email_unauthorized("tom_brown");
        assert!(err.to_string().contains("email of user 'tom_brown'"));

        let err = ForumError::Authorization {
            scope: PrivilegedScope::GroupMembers {
                group: "admins".into(),
            },
        };
        assert!(err.to_string().contains("members of group 'admins'"));
    }
}
