//! Discourse HTTP API client.
//!
//! Implements [`ForumApi`] against a Discourse forum's JSON endpoints:
//!
//! | Lookup | Request |
//! |---|---|
//! | profile | `GET /users/{username}.json` |
//! | email | `GET /users/{username}/emails.json` |
//! | groups | `GET /groups.json?page={n}` |
//! | members | `GET /groups/{id}/members.json?offset={o}&limit={l}` |
//!
//! Privileged requests carry `api_username` and `api_key` as query
//! parameters. Every request is awaited before the next one is sent.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::api::{ForumApi, ForumError, PrivilegedScope};
use crate::config::ForumConfig;
use crate::constants::{AVATAR_SIZE, IMAGE_MIME_TYPES, USER_AGENT};
use crate::models::{AttendeeRecord, Credentials, Group};
use crate::pagination::Page;

/// Reqwest-backed Discourse client.
#[derive(Debug, Clone)]
pub struct DiscourseClient {
    http: reqwest::Client,
    base_url: Url,
    affiliation_field: String,
    page_size: u32,
}

impl DiscourseClient {
    /// Client for the forum at `base_url` with default field and paging
    /// settings.
    pub fn new(base_url: &str) -> Result<Self, ForumError> {
        Self::from_config(&ForumConfig {
            base_url: base_url.to_string(),
            ..ForumConfig::default()
        })
    }

    pub fn from_config(config: &ForumConfig) -> Result<Self, ForumError> {
        let base_url = parse_base_url(&config.base_url)?;
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ForumError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            affiliation_field: config.affiliation_field.clone(),
            page_size: config.page_size.max(1),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of `segments` below the base URL. Each segment is
    /// percent-encoded on its own, so a username can never add a path
    /// component.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `parse_base_url` rejects cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET `url` and decode the JSON body.
    ///
    /// `on_status` maps statuses with a domain meaning (missing user,
    /// rejected credentials) to their error; any other non-success
    /// status becomes [`ForumError::UnexpectedStatus`].
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
        on_status: impl Fn(StatusCode) -> Option<ForumError>,
    ) -> Result<T, ForumError> {
        tracing::debug!(path = url.path(), "GET");

        let response = self
            .http
            .get(url.clone())
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| ForumError::Transport(format!("{}: {e}", url.path())))?;

        let status = response.status();
        if !status.is_success() {
            if let Some(err) = on_status(status) {
                return Err(err);
            }
            return Err(ForumError::UnexpectedStatus {
                url: url.path().to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ForumError::Decode(format!("{}: {e}", url.path())))
    }

    /// Check that `url` serves a PNG or JPEG image.
    ///
    /// Verification helper for avatar URLs; the attendee lookup itself
    /// returns avatar URLs without fetching them.
    pub async fn avatar_is_image(&self, url: &str) -> Result<bool, ForumError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ForumError::Transport(format!("{url}: {e}")))?;

        if response.status() != StatusCode::OK {
            return Ok(false);
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        Ok(is_image_content_type(content_type))
    }
}

#[async_trait]
impl ForumApi for DiscourseClient {
    async fn user_profile(&self, username: &str) -> Result<AttendeeRecord, ForumError> {
        let url = self.endpoint(&["users", &format!("{username}.json")]);
        let envelope: UserEnvelope = self
            .get_json(url, &[], |status| {
                (status == StatusCode::NOT_FOUND).then(|| ForumError::UserNotFound {
                    username: username.to_string(),
                })
            })
            .await?;
        Ok(envelope
            .user
            .into_record(&self.base_url, &self.affiliation_field))
    }

    async fn user_email(
        &self,
        username: &str,
        credentials: &Credentials,
    ) -> Result<String, ForumError> {
        let url = self.endpoint(&["users", username, "emails.json"]);
        let emails: EmailsResponse = self
            .get_json(url, &credentials.query_pairs(), |status| match status {
                StatusCode::NOT_FOUND => Some(ForumError::UserNotFound {
                    username: username.to_string(),
                }),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Some(ForumError::email_unauthorized(username))
                }
                _ => None,
            })
            .await?;
        emails
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ForumError::email_unauthorized(username))
    }

    async fn groups_page(
        &self,
        cursor: u64,
        credentials: &Credentials,
    ) -> Result<Page<Group>, ForumError> {
        let url = self.endpoint(&["groups.json"]);
        let page = cursor.to_string();
        let mut query = vec![("page", page.as_str())];
        query.extend(credentials.query_pairs());

        let listing: GroupsResponse = self
            .get_json(url, &query, |status| {
                is_auth_failure(status).then(|| ForumError::Authorization {
                    scope: PrivilegedScope::Groups,
                })
            })
            .await?;
        Ok(listing.into_page(cursor))
    }

    async fn group_members_page(
        &self,
        group_id: u64,
        cursor: u64,
        credentials: &Credentials,
    ) -> Result<Page<String>, ForumError> {
        let url = self.endpoint(&["groups", &group_id.to_string(), "members.json"]);
        let offset = cursor.to_string();
        let limit = self.page_size.to_string();
        let mut query = vec![("offset", offset.as_str()), ("limit", limit.as_str())];
        query.extend(credentials.query_pairs());

        let members: MembersResponse = self
            .get_json(url, &query, |status| {
                is_auth_failure(status).then(|| ForumError::Authorization {
                    scope: PrivilegedScope::GroupMembers {
                        group: group_id.to_string(),
                    },
                })
            })
            .await?;
        Ok(members.into_page(cursor))
    }
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

fn parse_base_url(raw: &str) -> Result<Url, ForumError> {
    let url = Url::parse(raw.trim()).map_err(|e| ForumError::InvalidBaseUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ForumError::InvalidBaseUrl(format!(
            "{raw}: expected an http(s) URL"
        )));
    }
    Ok(url)
}

/// Compare the media type of a `Content-Type` value, ignoring parameters.
fn is_image_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    IMAGE_MIME_TYPES.contains(&essence.as_str())
}

/// Turn a Discourse avatar template into an absolute URL.
///
/// Templates contain a `{size}` placeholder and are usually relative to
/// the forum root; CDN templates may be protocol-relative or absolute.
fn expand_avatar_template(template: &str, base_url: &Url) -> String {
    let path = template.replace("{size}", &AVATAR_SIZE.to_string());
    if path.starts_with("//") {
        return format!("{}:{path}", base_url.scheme());
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return path;
    }
    match base_url.join(&path) {
        Ok(url) => url.to_string(),
        Err(_) => path,
    }
}

// ── Response shapes ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: UserJson,
}

#[derive(Debug, Deserialize)]
struct UserJson {
    username: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    bio_raw: Option<String>,
    #[serde(default)]
    avatar_template: Option<String>,
    #[serde(default)]
    user_fields: Option<serde_json::Map<String, serde_json::Value>>,
}

impl UserJson {
    fn into_record(self, base_url: &Url, affiliation_field: &str) -> AttendeeRecord {
        let affiliation = self
            .user_fields
            .as_ref()
            .and_then(|fields| fields.get(affiliation_field))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let avatar_url = self
            .avatar_template
            .as_deref()
            .map(|t| expand_avatar_template(t, base_url))
            .unwrap_or_default();

        AttendeeRecord {
            username: self.username,
            name: self.name.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            website: self.website.unwrap_or_default(),
            bio: self.bio_raw.unwrap_or_default(),
            affiliation,
            avatar_url,
            email: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EmailsResponse {
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroupsResponse {
    #[serde(default)]
    groups: Vec<Group>,
    #[serde(default)]
    load_more_groups: Option<String>,
}

impl GroupsResponse {
    /// The group listing is numbered by page; `load_more_groups` is only
    /// present while more pages may follow.
    fn into_page(self, page: u64) -> Page<Group> {
        let next = (!self.groups.is_empty() && self.load_more_groups.is_some()).then_some(page + 1);
        Page::new(self.groups, next)
    }
}

#[derive(Debug, Deserialize)]
struct MemberJson {
    username: String,
}

#[derive(Debug, Deserialize)]
struct MembersMeta {
    total: u64,
}

#[derive(Debug, Deserialize)]
struct MembersResponse {
    #[serde(default)]
    members: Vec<MemberJson>,
    #[serde(default)]
    owners: Vec<MemberJson>,
    #[serde(default)]
    meta: Option<MembersMeta>,
}

impl MembersResponse {
    /// The member listing is offset-based; the next cursor is the offset
    /// just past this page while `meta.total` says more remain.
    fn into_page(self, offset: u64) -> Page<String> {
        let fetched = self.members.len() as u64;
        let next = match self.meta {
            Some(meta) if fetched > 0 && offset + fetched < meta.total => Some(offset + fetched),
            _ => None,
        };
        let usernames = self
            .owners
            .into_iter()
            .chain(self.members)
            .map(|m| m.username)
            .collect();
        Page::new(usernames, next)
    }
}
