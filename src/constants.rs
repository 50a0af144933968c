//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and forum defaults so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "attendees";

/// Crate version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `User-Agent` header sent with every forum request.
pub const USER_AGENT: &str = concat!("attendees/", env!("CARGO_PKG_VERSION"));

/// Local config filename (e.g. `.attendees.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".attendees.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "attendees";

/// Forum queried when nothing else is configured.
pub const DEFAULT_FORUM_URL: &str = "https://forum.openmod-initiative.org";

/// Custom user field that holds a member's affiliation.
pub const DEFAULT_AFFILIATION_FIELD: &str = "1";

/// Members requested per page from the group membership endpoint.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Pixel size substituted into the forum's avatar template.
pub const AVATAR_SIZE: u32 = 240;

/// Content types accepted for avatar images.
pub const IMAGE_MIME_TYPES: &[&str] = &["image/png", "image/jpeg"];

// ── Environment variable names ──────────────────────────────────────

pub const ENV_FORUM_URL: &str = "ATTENDEES_FORUM_URL";
pub const ENV_API_USERNAME: &str = "ATTENDEES_API_USERNAME";
pub const ENV_API_KEY: &str = "ATTENDEES_API_KEY";
pub const ENV_LOG: &str = "ATTENDEES_LOG";
