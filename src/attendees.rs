//! Attendee detail lookup.
//!
//! Fetches one profile per requested username (plus one email lookup per
//! user when asked) and assembles the results into an [`AttendeeTable`]
//! keyed by the usernames exactly as requested.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::api::{ForumApi, ForumError};
use crate::models::{AttendeeTable, Credentials};

/// Minimal `local@domain` shape. Intranet hosts need not be dotted.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").unwrap());

/// Look up every username and return their records keyed by username.
///
/// Requests are issued one at a time in input order; a username repeated
/// in the input is fetched once. Forum usernames ignore case, so
/// `tom_brown` and `TOM_BROWN` count as the same user and the row keeps
/// the spelling requested first. An unknown user aborts the whole batch
/// with [`ForumError::UserNotFound`]. With `retrieve_emails`, missing or
/// rejected credentials abort with an authorization error scoped to the
/// email of the affected user.
pub async fn attendee_list<A, S>(
    api: &A,
    usernames: &[S],
    credentials: Option<&Credentials>,
    retrieve_emails: bool,
) -> Result<AttendeeTable, ForumError>
where
    A: ForumApi + ?Sized,
    S: AsRef<str>,
{
    let mut table = AttendeeTable::default();
    let mut seen = HashSet::new();

    for username in usernames.iter().map(AsRef::<str>::as_ref) {
        if !seen.insert(username.to_lowercase()) {
            continue;
        }

        // Fail before spending a request on a user whose row cannot be completed.
        let email_credentials = match (retrieve_emails, credentials) {
            (false, _) => None,
            (true, Some(creds)) => Some(creds),
            (true, None) => return Err(ForumError::email_unauthorized(username)),
        };

        let mut record = api.user_profile(username).await?;
        if record.username != username {
            tracing::debug!(
                requested = username,
                canonical = %record.username,
                "forum returned canonical username"
            );
        }
        record.username = username.to_string();

        if let Some(creds) = email_credentials {
            let email = api.user_email(username, creds).await?;
            if !EMAIL_RE.is_match(&email) {
                return Err(ForumError::Decode(format!(
                    "email of user '{username}' is not an address: {email}"
                )));
            }
            record.email = Some(email);
        }

        table.insert(record);
    }

    tracing::info!(attendees = table.len(), emails = retrieve_emails, "fetched attendee details");
    Ok(table)
}

/// Arguments of [`attendee_list`] bundled for callers that build them up
/// step by step.
#[derive(Debug, Clone, Default)]
pub struct AttendeeQuery {
    pub usernames: Vec<String>,
    pub credentials: Option<Credentials>,
    pub retrieve_emails: bool,
}

impl AttendeeQuery {
    pub fn new(usernames: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            usernames: usernames.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_emails(mut self, retrieve_emails: bool) -> Self {
        self.retrieve_emails = retrieve_emails;
        self
    }

    /// Append usernames not already queued.
    pub fn extend(&mut self, usernames: impl IntoIterator<Item = String>) {
        for username in usernames {
            if !self.usernames.contains(&username) {
                self.usernames.push(username);
            }
        }
    }

    pub async fn run<A>(&self, api: &A) -> Result<AttendeeTable, ForumError>
    where
        A: ForumApi + ?Sized,
    {
        attendee_list(
            api,
            &self.usernames,
            self.credentials.as_ref(),
            self.retrieve_emails,
        )
        .await
    }
}
