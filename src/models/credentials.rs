//! API credentials for privileged forum lookups.

use serde::Deserialize;

/// An `(api_username, api_key)` pair.
///
/// Passed by reference into each call that needs it; nothing in the
/// crate keeps a copy beyond that call.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub api_username: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(api_username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_username: api_username.into(),
            api_key: api_key.into(),
        }
    }

    /// Build credentials only when both halves are present.
    pub fn from_parts(api_username: Option<String>, api_key: Option<String>) -> Option<Self> {
        match (api_username, api_key) {
            (Some(username), Some(key)) => Some(Self::new(username, key)),
            _ => None,
        }
    }

    /// Query parameters the forum expects on authenticated requests.
    pub fn query_pairs(&self) -> [(&'static str, &str); 2] {
        [
            ("api_username", self.api_username.as_str()),
            ("api_key", self.api_key.as_str()),
        ]
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_username", &self.api_username)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
