//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.attendees.toml` in the working directory
//! 4. `~/.config/attendees/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{
    DEFAULT_AFFILIATION_FIELD, DEFAULT_FORUM_URL, DEFAULT_PAGE_SIZE, ENV_API_KEY,
    ENV_API_USERNAME, ENV_FORUM_URL,
};
use crate::env::Env;
use crate::models::Credentials;
use crate::validate::UsernamePolicy;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub forum: ForumConfig,
    pub usernames: UsernamePolicy,
    pub credentials: CredentialsConfig,
}

/// Which forum to talk to and how to read its responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForumConfig {
    pub base_url: String,
    /// Key of the custom user field holding a member's affiliation.
    pub affiliation_field: String,
    /// Members requested per page from group membership listings.
    pub page_size: u32,
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FORUM_URL.to_string(),
            affiliation_field: DEFAULT_AFFILIATION_FIELD.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// API credentials for privileged lookups.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub api_username: Option<String>,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_username", &self.api_username)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl CredentialsConfig {
    /// Credentials when both the username and the key are configured.
    pub fn resolve(&self) -> Option<Credentials> {
        Credentials::from_parts(self.api_username.clone(), self.api_key.clone())
    }
}

/// One config file as written. Keys absent from the file stay `None` so
/// that merging only touches what the file sets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigLayer {
    forum: ForumLayer,
    usernames: UsernamesLayer,
    credentials: CredentialsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ForumLayer {
    base_url: Option<String>,
    affiliation_field: Option<String>,
    page_size: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct UsernamesLayer {
    min_length: Option<usize>,
    max_length: Option<usize>,
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, then `.attendees.toml` in `work_dir`,
    /// then applies environment variable overrides. CLI flags are applied
    /// by the caller afterwards.
    pub fn load(work_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: working-directory config
        if let Some(dir) = work_dir {
            let local_path = dir.join(crate::constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        tracing::debug!(forum = %config.forum.base_url, credentials = ?config.credentials, "config loaded");
        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<ConfigLayer, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(crate::constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge a config file into this one. Every key the file sets wins,
    /// even when it equals the built-in default.
    fn merge(&mut self, layer: ConfigLayer) {
        if let Some(base_url) = layer.forum.base_url {
            self.forum.base_url = base_url;
        }
        if let Some(field) = layer.forum.affiliation_field {
            self.forum.affiliation_field = field;
        }
        if let Some(page_size) = layer.forum.page_size {
            self.forum.page_size = page_size;
        }

        if let Some(min) = layer.usernames.min_length {
            self.usernames.min_length = min;
        }
        if let Some(max) = layer.usernames.max_length {
            self.usernames.max_length = max;
        }

        if layer.credentials.api_username.is_some() {
            self.credentials.api_username = layer.credentials.api_username;
        }
        if layer.credentials.api_key.is_some() {
            self.credentials.api_key = layer.credentials.api_key;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(val) = env.get(ENV_FORUM_URL) {
            if val.starts_with("http://") || val.starts_with("https://") {
                self.forum.base_url = val;
            } else {
                tracing::warn!("ignoring invalid {ENV_FORUM_URL} value: {val}");
            }
        }
        if let Some(val) = env.get(ENV_API_USERNAME) {
            self.credentials.api_username = Some(val);
        }
        if let Some(val) = env.get(ENV_API_KEY) {
            self.credentials.api_key = Some(val);
        }
    }
}
