//! Group name resolution and membership listing.

use indexmap::IndexSet;

use crate::api::{ForumApi, ForumError, PrivilegedScope};
use crate::models::Credentials;
use crate::pagination::Pages;

/// Numeric id of the group called exactly `group_name`.
///
/// Walks the group listing page by page and stops at the first exact,
/// case-sensitive match. Fails with [`ForumError::GroupNotFound`] once
/// every page has been read without one.
pub async fn resolve_group_id<A>(
    api: &A,
    group_name: &str,
    credentials: &Credentials,
) -> Result<u64, ForumError>
where
    A: ForumApi + ?Sized,
{
    let mut pages = Pages::new(move |cursor| api.groups_page(cursor, credentials));

    while let Some(groups) = pages.next_page().await? {
        if let Some(group) = groups.into_iter().find(|g| g.name == group_name) {
            tracing::info!(group = group_name, id = group.id, "resolved group");
            return Ok(group.id);
        }
    }

    tracing::debug!(group = group_name, pages = pages.pages_fetched(), "group not found");
    Err(ForumError::GroupNotFound {
        name: group_name.to_string(),
    })
}

/// Usernames of every member of `group_name`, in listing order.
///
/// A group without members yields an empty vector. Owners listed
/// alongside members appear once.
pub async fn group_members<A>(
    api: &A,
    group_name: &str,
    credentials: &Credentials,
) -> Result<Vec<String>, ForumError>
where
    A: ForumApi + ?Sized,
{
    let group_id = resolve_group_id(api, group_name, credentials).await?;

    let pages = Pages::new(move |cursor| api.group_members_page(group_id, cursor, credentials));
    let usernames = pages.try_collect().await.map_err(|e| match e {
        ForumError::Authorization {
            scope: PrivilegedScope::GroupMembers { .. },
        } => ForumError::Authorization {
            scope: PrivilegedScope::GroupMembers {
                group: group_name.to_string(),
            },
        },
        other => other,
    })?;

    let members: IndexSet<String> = usernames.into_iter().collect();
    tracing::info!(group = group_name, members = members.len(), "listed group members");
    Ok(members.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendeeRecord, Group};
    use crate::pagination::Page;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Group listing split into fixed pages, member listings by group id.
    struct FakeForum {
        group_pages: Vec<Vec<Group>>,
        members: Vec<(u64, Vec<&'static str>)>,
        member_page_size: usize,
        reject_members: bool,
        requests: Mutex<Vec<String>>,
    }

    impl FakeForum {
        fn new() -> Self {
            Self {
                group_pages: vec![
                    vec![group(1, "admins"), group(2, "moderators")],
                    vec![group(3, "staff"), group(41, "Admins")],
                    vec![group(42, "modellers")],
                ],
                members: vec![
                    (1, vec!["timtroendle", "tom_brown", "wolf"]),
                    (2, vec![]),
                    (42, vec!["a", "b", "c", "d", "e"]),
                ],
                member_page_size: 2,
                reject_members: false,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    fn group(id: u64, name: &str) -> Group {
        Group {
            id,
            name: name.to_string(),
        }
    }

    #[async_trait]
    impl ForumApi for FakeForum {
        async fn user_profile(&self, username: &str) -> Result<AttendeeRecord, ForumError> {
            Err(ForumError::UserNotFound {
                username: username.to_string(),
            })
        }

        async fn user_email(&self, username: &str, _: &Credentials) -> Result<String, ForumError> {
            Err(ForumError::email_unauthorized(username))
        }

        async fn groups_page(
            &self,
            cursor: u64,
            _: &Credentials,
        ) -> Result<Page<Group>, ForumError> {
            self.requests.lock().unwrap().push(format!("groups:{cursor}"));
            let index = cursor as usize;
            let items = self.group_pages.get(index).cloned().unwrap_or_default();
            let next = (index + 1 < self.group_pages.len()).then_some(cursor + 1);
            Ok(Page::new(items, next))
        }

        async fn group_members_page(
            &self,
            group_id: u64,
            cursor: u64,
            _: &Credentials,
        ) -> Result<Page<String>, ForumError> {
            self.requests
                .lock()
                .unwrap()
                .push(format!("members:{group_id}:{cursor}"));
            if self.reject_members {
                return Err(ForumError::Authorization {
                    scope: PrivilegedScope::GroupMembers {
                        group: group_id.to_string(),
                    },
                });
            }
            let all = self
                .members
                .iter()
                .find(|(id, _)| *id == group_id)
                .map(|(_, m)| m.clone())
                .unwrap_or_default();
            let start = (cursor as usize).min(all.len());
            let end = (start + self.member_page_size).min(all.len());
            let items = all[start..end].iter().map(|s| s.to_string()).collect();
            let next = (end < all.len()).then_some(end as u64);
            Ok(Page::new(items, next))
        }
    }

    fn creds() -> Credentials {
        Credentials::new("system", "key")
    }

    #[tokio::test]
    async fn resolves_known_groups() {
        let forum = FakeForum::new();
        assert_eq!(resolve_group_id(&forum, "admins", &creds()).await.unwrap(), 1);
        assert_eq!(resolve_group_id(&forum, "moderators", &creds()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn stops_at_first_match() {
        let forum = FakeForum::new();
        resolve_group_id(&forum, "admins", &creds()).await.unwrap();
        assert_eq!(forum.requests(), vec!["groups:0"]);
    }

    #[tokio::test]
    async fn resolution_is_stable() {
        let forum = FakeForum::new();
        let first = resolve_group_id(&forum, "staff", &creds()).await.unwrap();
        let second = resolve_group_id(&forum, "staff", &creds()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn match_is_case_sensitive() {
        let forum = FakeForum::new();
        assert_eq!(resolve_group_id(&forum, "Admins", &creds()).await.unwrap(), 41);
        let err = resolve_group_id(&forum, "ADMINS", &creds()).await.unwrap_err();
        assert!(matches!(err, ForumError::GroupNotFound { .. }));
    }

    #[tokio::test]
    async fn unknown_group_reads_every_page() {
        let forum = FakeForum::new();
        for name in ["asdasd231234", "dasvhzt6"] {
            let err = resolve_group_id(&forum, name, &creds()).await.unwrap_err();
            assert!(matches!(err, ForumError::GroupNotFound { name: ref n } if n == name));
        }
        assert_eq!(
            forum.requests(),
            vec!["groups:0", "groups:1", "groups:2", "groups:0", "groups:1", "groups:2"]
        );
    }

    #[tokio::test]
    async fn no_partial_matches() {
        let forum = FakeForum::new();
        let err = resolve_group_id(&forum, "admin", &creds()).await.unwrap_err();
        assert!(matches!(err, ForumError::GroupNotFound { .. }));
    }

    #[tokio::test]
    async fn lists_members_across_pages() {
        let forum = FakeForum::new();
        let admins = group_members(&forum, "admins", &creds()).await.unwrap();
        assert_eq!(admins, vec!["timtroendle", "tom_brown", "wolf"]);
        assert_eq!(
            forum.requests(),
            vec!["groups:0", "members:1:0", "members:1:2"]
        );
    }

    #[tokio::test]
    async fn empty_group_is_not_an_error() {
        let forum = FakeForum::new();
        let moderators = group_members(&forum, "moderators", &creds()).await.unwrap();
        assert!(moderators.is_empty());
    }

    #[tokio::test]
    async fn members_of_group_on_later_page() {
        let forum = FakeForum::new();
        let members = group_members(&forum, "modellers", &creds()).await.unwrap();
        assert_eq!(members, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn unknown_group_propagates_from_members() {
        let forum = FakeForum::new();
        let err = group_members(&forum, "asdasd231234", &creds()).await.unwrap_err();
        assert!(matches!(err, ForumError::GroupNotFound { ref name } if name == "asdasd231234"));
        assert!(forum.requests().iter().all(|r| r.starts_with("groups:")));
    }

    #[tokio::test]
    async fn rejected_member_listing_names_the_group() {
        let forum = FakeForum {
            reject_members: true,
            ..FakeForum::new()
        };
        let err = group_members(&forum, "admins", &creds()).await.unwrap_err();
        assert!(matches!(
            err,
            ForumError::Authorization {
                scope: PrivilegedScope::GroupMembers { ref group }
            } if group == "admins"
        ));
        assert!(err.to_string().contains("group 'admins'"));
        assert_eq!(forum.requests(), vec!["groups:0", "members:1:0"]);
    }
}
