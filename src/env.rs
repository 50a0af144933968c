//! Environment variable abstraction for testability.
//!
//! Production code uses [`Env::real()`] which delegates to [`std::env::var`].
//! Tests use [`Env::mock()`] backed by a `HashMap`, so config layering can
//! be exercised without touching the process environment.

use std::collections::HashMap;

/// Environment variable reader.
#[derive(Clone, Debug, Default)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up a variable, treating blank values as unset.
    ///
    /// CI systems commonly export secrets as empty strings when they are
    /// not configured; an empty api key must not count as a credential.
    pub fn get(&self, name: &str) -> Option<String> {
        let value = match &self.overrides {
            Some(map) => map.get(name).cloned(),
            None => std::env::var(name).ok(),
        }?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Returns `true` if the variable is present and non-blank.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_env_reads_cargo_manifest_dir() {
        let env = Env::real();
        assert!(env.get("CARGO_MANIFEST_DIR").is_some());
    }

    #[test]
    fn mock_env_returns_set_values() {
        let env = Env::mock([("ATTENDEES_API_USERNAME", "system")]);
        assert_eq!(env.get("ATTENDEES_API_USERNAME").as_deref(), Some("system"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let env = Env::mock([("ATTENDEES_API_KEY", "   "), ("EMPTY", "")]);
        assert_eq!(env.get("ATTENDEES_API_KEY"), None);
        assert!(!env.is_set("EMPTY"));
    }

    #[test]
    fn values_are_trimmed() {
        let env = Env::mock([("ATTENDEES_FORUM_URL", " https://forum.example.org\n")]);
        assert_eq!(
            env.get("ATTENDEES_FORUM_URL").as_deref(),
            Some("https://forum.example.org")
        );
    }
}
