//! User service - User administration on top of the identity store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use common::{page_count, AppError, AppResult, OptionExt};
use domain::{is_authorized, IdentityResult, NewUser, Principal, PseudoRoleNames, Role, User};

use crate::repository::{IdentityManager, RoleManager, UserPage};

/// Which page of users to show.
///
/// `number_of_users == 0` takes every user from `start_index` on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsersQuery {
    pub start_index: u64,
    pub number_of_users: u64,
}

/// One page of users ordered by email
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UsersView {
    pub users: Vec<User>,
    pub total_records: u64,
    pub number_of_pages: u64,
}

/// A user with assigned and assignable roles, both sorted by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRolesView {
    pub user: User,
    pub user_roles: Vec<String>,
    pub available_roles: Vec<Role>,
}

/// User service trait for dependency injection.
///
/// Mutations look the user up first and fail with
/// [`AppError::UserNotFound`] before touching the identity store.
/// A refused operation fails with [`AppError::Identity`].
#[async_trait]
pub trait UserService: Send + Sync {
    /// Page through users; empty when the store cannot enumerate users
    async fn get_users_view(&self, query: &UsersQuery) -> AppResult<UsersView>;

    /// `None` when the user does not exist
    async fn get_user_roles_view(&self, id: Uuid) -> AppResult<Option<UserRolesView>>;

    fn is_user_authorized(
        &self,
        principal: Option<&dyn Principal>,
        roles: Option<&[String]>,
    ) -> bool;

    fn is_user_authorized_for_roles(
        &self,
        principal: Option<&dyn Principal>,
        roles: &[Role],
    ) -> bool;

    /// Register a user whose user name is its email
    async fn create_user(&self, email: &str) -> AppResult<()>;

    async fn add_user_to_role(&self, id: Uuid, role: &str) -> AppResult<()>;

    async fn remove_user_from_role(&self, id: Uuid, role: &str) -> AppResult<()>;

    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService over the identity collaborators.
pub struct UserAdmin {
    users: Arc<dyn IdentityManager>,
    roles: Arc<dyn RoleManager>,
    pseudo_roles: PseudoRoleNames,
}

impl UserAdmin {
    pub fn new(
        users: Arc<dyn IdentityManager>,
        roles: Arc<dyn RoleManager>,
        pseudo_roles: PseudoRoleNames,
    ) -> Self {
        Self {
            users,
            roles,
            pseudo_roles,
        }
    }

    async fn find_user(&self, id: Uuid) -> AppResult<User> {
        self.users.find_by_id(id).await?.ok_or_user_not_found()
    }
}

fn ensure_succeeded(result: IdentityResult) -> AppResult<()> {
    if result.succeeded() {
        Ok(())
    } else {
        Err(AppError::Identity(result.into_errors()))
    }
}

#[async_trait]
impl UserService for UserAdmin {
    async fn get_users_view(&self, query: &UsersQuery) -> AppResult<UsersView> {
        if !self.users.supports_queryable_users() {
            tracing::warn!("Identity store cannot enumerate users, returning an empty list");
            return Ok(UsersView::default());
        }

        let page = UserPage {
            offset: query.start_index,
            limit: (query.number_of_users > 0).then_some(query.number_of_users),
        };

        let (total_records, users) =
            tokio::try_join!(self.users.count_users(), self.users.list_users(page))?;

        Ok(UsersView {
            users,
            total_records,
            number_of_pages: page_count(total_records, query.number_of_users),
        })
    }

    async fn get_user_roles_view(&self, id: Uuid) -> AppResult<Option<UserRolesView>> {
        let Some(user) = self.users.find_by_id(id).await? else {
            return Ok(None);
        };

        let (mut user_roles, all_roles) =
            tokio::try_join!(self.users.get_roles(&user), self.roles.roles())?;
        user_roles.sort();

        let mut available_roles: Vec<Role> = all_roles
            .into_iter()
            .filter(|role| !user_roles.contains(&role.name))
            .collect();
        available_roles.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Some(UserRolesView {
            user,
            user_roles,
            available_roles,
        }))
    }

    fn is_user_authorized(
        &self,
        principal: Option<&dyn Principal>,
        roles: Option<&[String]>,
    ) -> bool {
        is_authorized(principal, roles, &self.pseudo_roles)
    }

    fn is_user_authorized_for_roles(
        &self,
        principal: Option<&dyn Principal>,
        roles: &[Role],
    ) -> bool {
        let names: Vec<&str> = roles.iter().map(|role| role.name.as_str()).collect();
        is_authorized(principal, Some(names.as_slice()), &self.pseudo_roles)
    }

    async fn create_user(&self, email: &str) -> AppResult<()> {
        let result = self.users.create(NewUser::from_email(email)).await?;
        ensure_succeeded(result)
    }

    async fn add_user_to_role(&self, id: Uuid, role: &str) -> AppResult<()> {
        let user = self.find_user(id).await?;
        ensure_succeeded(self.users.add_to_role(&user, role).await?)
    }

    async fn remove_user_from_role(&self, id: Uuid, role: &str) -> AppResult<()> {
        let user = self.find_user(id).await?;
        ensure_succeeded(self.users.remove_from_role(&user, role).await?)
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        let user = self.find_user(id).await?;
        ensure_succeeded(self.users.delete(&user).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockIdentityManager, MockRoleManager};
    use domain::{ClaimsPrincipal, IdentityError, ERROR_DUPLICATE_EMAIL, ERROR_DUPLICATE_USER_NAME};
    use mockall::predicate::eq;

    fn service(users: MockIdentityManager, roles: MockRoleManager) -> UserAdmin {
        UserAdmin::new(Arc::new(users), Arc::new(roles), PseudoRoleNames::default())
    }

    fn user(email: &str) -> User {
        User::with_email(Uuid::new_v4(), email)
    }

    fn roles(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn allows(service: &UserAdmin, principal: &dyn Principal, required: &[&str]) -> bool {
        service.is_user_authorized(Some(principal), Some(roles(required).as_slice()))
    }

    #[tokio::test]
    async fn test_users_view_pages_by_email() {
        let mut users = MockIdentityManager::new();
        users.expect_supports_queryable_users().return_const(true);
        users.expect_count_users().returning(|| Ok(5));
        users
            .expect_list_users()
            .with(eq(UserPage {
                offset: 2,
                limit: Some(2),
            }))
            .times(1)
            .returning(|_| Ok(vec![user("c@example.com"), user("d@example.com")]));

        let service = service(users, MockRoleManager::new());
        let view = service
            .get_users_view(&UsersQuery {
                start_index: 2,
                number_of_users: 2,
            })
            .await
            .unwrap();

        assert_eq!(view.users.len(), 2);
        assert_eq!(view.users[0].email, "c@example.com");
        assert_eq!(view.total_records, 5);
        assert_eq!(view.number_of_pages, 3);
    }

    #[tokio::test]
    async fn test_users_view_zero_count_takes_the_rest() {
        let mut users = MockIdentityManager::new();
        users.expect_supports_queryable_users().return_const(true);
        users.expect_count_users().returning(|| Ok(3));
        users
            .expect_list_users()
            .with(eq(UserPage {
                offset: 1,
                limit: None,
            }))
            .times(1)
            .returning(|_| Ok(vec![user("b@example.com"), user("c@example.com")]));

        let service = service(users, MockRoleManager::new());
        let view = service
            .get_users_view(&UsersQuery {
                start_index: 1,
                number_of_users: 0,
            })
            .await
            .unwrap();

        assert_eq!(view.users.len(), 2);
        assert_eq!(view.total_records, 3);
        assert_eq!(view.number_of_pages, 1);
    }

    #[tokio::test]
    async fn test_users_view_empty_when_store_cannot_enumerate() {
        let mut users = MockIdentityManager::new();
        users.expect_supports_queryable_users().return_const(false);
        users.expect_count_users().never();
        users.expect_list_users().never();

        let service = service(users, MockRoleManager::new());
        let view = service.get_users_view(&UsersQuery::default()).await.unwrap();

        assert_eq!(view, UsersView::default());
    }

    #[tokio::test]
    async fn test_user_roles_view_sorts_assigned_and_available() {
        let editor = user("editor@example.com");
        let id = editor.id;

        let mut users = MockIdentityManager::new();
        users
            .expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(editor.clone())));
        users
            .expect_get_roles()
            .returning(|_| Ok(roles(&["Editor", "Admin"])));

        let mut role_manager = MockRoleManager::new();
        role_manager.expect_roles().returning(|| {
            Ok(vec![
                Role::new(Uuid::new_v4(), "Writer"),
                Role::new(Uuid::new_v4(), "Admin"),
                Role::new(Uuid::new_v4(), "Editor"),
                Role::new(Uuid::new_v4(), "Author"),
            ])
        });

        let service = service(users, role_manager);
        let view = service.get_user_roles_view(id).await.unwrap().unwrap();

        assert_eq!(view.user.id, id);
        assert_eq!(view.user_roles, roles(&["Admin", "Editor"]));
        let available: Vec<&str> = view
            .available_roles
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(available, vec!["Author", "Writer"]);
    }

    #[tokio::test]
    async fn test_user_roles_view_missing_user() {
        let mut users = MockIdentityManager::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        users.expect_get_roles().never();

        let service = service(users, MockRoleManager::new());
        let view = service.get_user_roles_view(Uuid::new_v4()).await.unwrap();

        assert!(view.is_none());
    }

    #[test]
    fn test_authorization_rejects_missing_inputs() {
        let service = service(MockIdentityManager::new(), MockRoleManager::new());
        let principal = ClaimsPrincipal::authenticated("editor", ["Editor"]);
        let principal: &dyn Principal = &principal;
        let everyone = roles(&["Everyone"]);
        let empty: Vec<String> = Vec::new();

        assert!(!service.is_user_authorized(None, Some(everyone.as_slice())));
        assert!(!service.is_user_authorized(Some(principal), None));
        assert!(!service.is_user_authorized(Some(principal), Some(empty.as_slice())));
    }

    #[test]
    fn test_authorization_pseudo_roles() {
        let service = service(MockIdentityManager::new(), MockRoleManager::new());
        let anonymous = ClaimsPrincipal::anonymous();
        let member = ClaimsPrincipal::authenticated("member", Vec::<String>::new());

        assert!(allows(&service, &anonymous, &["Everyone"]));
        assert!(allows(&service, &anonymous, &["Anonymous"]));
        assert!(!allows(&service, &anonymous, &["Admin"]));

        // Any authenticated principal passes a role other than Registered
        assert!(allows(&service, &member, &["Admin"]));
        assert!(!allows(&service, &member, &["Registered"]));
    }

    #[test]
    fn test_authorization_uses_configured_names() {
        let names = PseudoRoleNames {
            everyone: "All".to_string(),
            registered: "Members".to_string(),
            anonymous: "Guests".to_string(),
        };
        let service = UserAdmin::new(
            Arc::new(MockIdentityManager::new()),
            Arc::new(MockRoleManager::new()),
            names,
        );
        let anonymous = ClaimsPrincipal::anonymous();
        let member = ClaimsPrincipal::authenticated("member", ["Members"]);

        assert!(allows(&service, &anonymous, &["All"]));
        assert!(!allows(&service, &anonymous, &["Everyone"]));
        assert!(allows(&service, &member, &["Members"]));
    }

    #[test]
    fn test_authorization_for_role_records() {
        let service = service(MockIdentityManager::new(), MockRoleManager::new());
        let anonymous = ClaimsPrincipal::anonymous();

        assert!(!service.is_user_authorized_for_roles(Some(&anonymous as &dyn Principal), &[]));
        assert!(service.is_user_authorized_for_roles(
            Some(&anonymous as &dyn Principal),
            &[
                Role::new(Uuid::new_v4(), "Admin"),
                Role::new(Uuid::new_v4(), "Anonymous"),
            ],
        ));
    }

    #[tokio::test]
    async fn test_create_user_uses_email_as_user_name() {
        let mut users = MockIdentityManager::new();
        users
            .expect_create()
            .with(eq(NewUser::from_email("new@example.com")))
            .times(1)
            .returning(|_| Ok(IdentityResult::success()));

        let service = service(users, MockRoleManager::new());
        assert!(service.create_user("new@example.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_create_user_failure_carries_descriptions() {
        let mut users = MockIdentityManager::new();
        users.expect_create().returning(|_| {
            Ok(IdentityResult::failed(vec![
                IdentityError::new(
                    ERROR_DUPLICATE_USER_NAME,
                    "User name 'a@b.c' is already taken.",
                ),
                IdentityError::new(ERROR_DUPLICATE_EMAIL, "Email 'a@b.c' is already taken."),
            ]))
        });

        let service = service(users, MockRoleManager::new());
        let err = service.create_user("a@b.c").await.unwrap_err();

        assert!(matches!(err, AppError::Identity(_)));
        assert_eq!(
            err.to_string(),
            "User name 'a@b.c' is already taken.\nEmail 'a@b.c' is already taken."
        );
    }

    #[tokio::test]
    async fn test_add_user_to_role_success() {
        let editor = user("editor@example.com");
        let id = editor.id;

        let mut users = MockIdentityManager::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(editor.clone())));
        users
            .expect_add_to_role()
            .withf(move |u, role| u.id == id && role == "Editor")
            .times(1)
            .returning(|_, _| Ok(IdentityResult::success()));

        let service = service(users, MockRoleManager::new());
        assert!(service.add_user_to_role(id, "Editor").await.is_ok());
    }

    #[tokio::test]
    async fn test_mutations_on_missing_user_never_reach_the_store() {
        let mut users = MockIdentityManager::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        users.expect_add_to_role().never();
        users.expect_remove_from_role().never();
        users.expect_delete().never();

        let service = service(users, MockRoleManager::new());
        let id = Uuid::new_v4();

        let err = service.add_user_to_role(id, "Editor").await.unwrap_err();
        assert!(matches!(err, AppError::UserNotFound));
        assert_eq!(err.to_string(), "User Not Found.");

        let err = service.remove_user_from_role(id, "Editor").await.unwrap_err();
        assert!(matches!(err, AppError::UserNotFound));

        let err = service.delete_user(id).await.unwrap_err();
        assert!(matches!(err, AppError::UserNotFound));
    }

    #[tokio::test]
    async fn test_remove_user_from_role_failure() {
        let editor = user("editor@example.com");
        let id = editor.id;

        let mut users = MockIdentityManager::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(editor.clone())));
        users.expect_remove_from_role().returning(|_, _| {
            Ok(IdentityResult::failed(vec![IdentityError::new(
                "UserNotInRole",
                "User is not in role 'Editor'.",
            )]))
        });

        let service = service(users, MockRoleManager::new());
        let err = service.remove_user_from_role(id, "Editor").await.unwrap_err();

        assert_eq!(err.identity_errors()[0].code, "UserNotInRole");
    }
}
