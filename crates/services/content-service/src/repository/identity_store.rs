//! Identity store: users, roles and role assignments.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, JoinType, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::role::{self, Entity as RoleEntity};
use super::entities::user::{self, Entity as UserEntity};
use super::entities::user_role::{self, Entity as UserRoleEntity};
use super::finish;
use common::{AppError, AppResult};
use domain::{
    IdentityError, IdentityResult, NewUser, Role, User, UserRules, ERROR_DUPLICATE_EMAIL,
    ERROR_DUPLICATE_ROLE_NAME, ERROR_DUPLICATE_USER_NAME, ERROR_INVALID_ROLE_NAME,
    ERROR_ROLE_NOT_FOUND, ERROR_USER_ALREADY_IN_ROLE, ERROR_USER_NOT_IN_ROLE,
    MAX_ROLE_NAME_LENGTH,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A window over the users ordered by email.
///
/// `limit: None` takes every user after `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserPage {
    pub offset: u64,
    pub limit: Option<u64>,
}

/// Largest LIMIT both Postgres (BIGINT) and SQLite accept
const UNBOUNDED_LIMIT: u64 = i64::MAX as u64;

/// User management backed by an identity store.
///
/// Infrastructure failures are `Err`. A store that answered but refused
/// the operation returns `Ok` with a failed [`IdentityResult`].
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait IdentityManager: Send + Sync {
    /// Whether users can be counted and paged
    fn supports_queryable_users(&self) -> bool;

    async fn count_users(&self) -> AppResult<u64>;

    /// Users ordered by email
    async fn list_users(&self, page: UserPage) -> AppResult<Vec<User>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn create(&self, user: NewUser) -> AppResult<IdentityResult>;

    async fn add_to_role(&self, user: &User, role: &str) -> AppResult<IdentityResult>;

    async fn remove_from_role(&self, user: &User, role: &str) -> AppResult<IdentityResult>;

    /// Permanently delete the user and its role assignments
    async fn delete(&self, user: &User) -> AppResult<IdentityResult>;

    /// Names of the roles assigned to the user
    async fn get_roles(&self, user: &User) -> AppResult<Vec<String>>;
}

/// Assignable roles
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleManager: Send + Sync {
    async fn roles(&self) -> AppResult<Vec<Role>>;

    async fn create_role(&self, name: &str) -> AppResult<IdentityResult>;
}

/// SeaORM implementation of the identity collaborators
pub struct IdentityStore {
    db: DatabaseConnection,
}

impl IdentityStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_role(&self, name: &str) -> AppResult<Option<role::Model>> {
        Ok(RoleEntity::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await?)
    }
}

fn role_not_found(name: &str) -> IdentityResult {
    IdentityResult::failed(vec![IdentityError::new(
        ERROR_ROLE_NOT_FOUND,
        format!("Role '{}' does not exist.", name),
    )])
}

async fn delete_user_graph(txn: &DatabaseTransaction, id: Uuid) -> AppResult<()> {
    UserRoleEntity::delete_many()
        .filter(user_role::Column::UserId.eq(id))
        .exec(txn)
        .await?;

    let result = UserEntity::delete_by_id(id).exec(txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::UserNotFound);
    }

    Ok(())
}

#[async_trait]
impl IdentityManager for IdentityStore {
    fn supports_queryable_users(&self) -> bool {
        true
    }

    async fn count_users(&self) -> AppResult<u64> {
        Ok(UserEntity::find().count(&self.db).await?)
    }

    async fn list_users(&self, page: UserPage) -> AppResult<Vec<User>> {
        // SQLite rejects OFFSET without LIMIT
        let limit = page.limit.unwrap_or(UNBOUNDED_LIMIT);
        let models = UserEntity::find()
            .order_by_asc(user::Column::Email)
            .offset(page.offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn create(&self, user: NewUser) -> AppResult<IdentityResult> {
        let mut errors = user.validation_errors();

        if !self.is_user_name_unique(&user.user_name, None).await? {
            errors.push(IdentityError::new(
                ERROR_DUPLICATE_USER_NAME,
                format!("User name '{}' is already taken.", user.user_name),
            ));
        }
        if !self.is_user_email_unique(&user.email, None).await? {
            errors.push(IdentityError::new(
                ERROR_DUPLICATE_EMAIL,
                format!("Email '{}' is already taken.", user.email),
            ));
        }

        if !errors.is_empty() {
            return Ok(IdentityResult::failed(errors));
        }

        let now = chrono::Utc::now();
        let id = Uuid::new_v4();
        UserEntity::insert(user::ActiveModel {
            id: Set(id),
            user_name: Set(user.user_name),
            email: Set(user.email),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .exec_without_returning(&self.db)
        .await?;

        tracing::info!(user_id = %id, "User created");
        Ok(IdentityResult::success())
    }

    async fn add_to_role(&self, user: &User, role: &str) -> AppResult<IdentityResult> {
        let Some(stored_role) = self.find_role(role).await? else {
            return Ok(role_not_found(role));
        };

        let assigned = UserRoleEntity::find_by_id((user.id, stored_role.id))
            .one(&self.db)
            .await?;
        if assigned.is_some() {
            return Ok(IdentityResult::failed(vec![IdentityError::new(
                ERROR_USER_ALREADY_IN_ROLE,
                format!("User already in role '{}'.", role),
            )]));
        }

        UserRoleEntity::insert(user_role::ActiveModel {
            user_id: Set(user.id),
            role_id: Set(stored_role.id),
        })
        .exec_without_returning(&self.db)
        .await?;

        tracing::info!(user_id = %user.id, role, "User added to role");
        Ok(IdentityResult::success())
    }

    async fn remove_from_role(&self, user: &User, role: &str) -> AppResult<IdentityResult> {
        let Some(stored_role) = self.find_role(role).await? else {
            return Ok(role_not_found(role));
        };

        let result = UserRoleEntity::delete_by_id((user.id, stored_role.id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Ok(IdentityResult::failed(vec![IdentityError::new(
                ERROR_USER_NOT_IN_ROLE,
                format!("User is not in role '{}'.", role),
            )]));
        }

        tracing::info!(user_id = %user.id, role, "User removed from role");
        Ok(IdentityResult::success())
    }

    async fn delete(&self, user: &User) -> AppResult<IdentityResult> {
        let txn = self.db.begin().await?;
        let result = delete_user_graph(&txn, user.id).await;
        finish(txn, result).await?;

        tracing::info!(user_id = %user.id, "User deleted");
        Ok(IdentityResult::success())
    }

    async fn get_roles(&self, user: &User) -> AppResult<Vec<String>> {
        let roles = RoleEntity::find()
            .join(JoinType::InnerJoin, role::Relation::UserRoles.def())
            .filter(user_role::Column::UserId.eq(user.id))
            .all(&self.db)
            .await?;

        Ok(roles.into_iter().map(|r| r.name).collect())
    }
}

#[async_trait]
impl RoleManager for IdentityStore {
    async fn roles(&self) -> AppResult<Vec<Role>> {
        let models = RoleEntity::find()
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Role::from).collect())
    }

    async fn create_role(&self, name: &str) -> AppResult<IdentityResult> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_ROLE_NAME_LENGTH {
            return Ok(IdentityResult::failed(vec![IdentityError::new(
                ERROR_INVALID_ROLE_NAME,
                format!("Role name '{}' is invalid.", name),
            )]));
        }

        if self.find_role(name).await?.is_some() {
            return Ok(IdentityResult::failed(vec![IdentityError::new(
                ERROR_DUPLICATE_ROLE_NAME,
                format!("Role name '{}' is already taken.", name),
            )]));
        }

        let id = Uuid::new_v4();
        RoleEntity::insert(role::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
        })
        .exec_without_returning(&self.db)
        .await?;

        tracing::info!(role_id = %id, role = name, "Role created");
        Ok(IdentityResult::success())
    }
}

#[async_trait]
impl UserRules for IdentityStore {
    type Error = AppError;

    async fn is_user_name_unique(
        &self,
        name: &str,
        except_user_id: Option<Uuid>,
    ) -> AppResult<bool> {
        let mut query = UserEntity::find().filter(user::Column::UserName.eq(name));
        if let Some(id) = except_user_id {
            query = query.filter(user::Column::Id.ne(id));
        }

        Ok(query.count(&self.db).await? == 0)
    }

    async fn is_user_email_unique(
        &self,
        email: &str,
        except_user_id: Option<Uuid>,
    ) -> AppResult<bool> {
        let mut query = UserEntity::find().filter(user::Column::Email.eq(email));
        if let Some(id) = except_user_id {
            query = query.filter(user::Column::Id.ne(id));
        }

        Ok(query.count(&self.db).await? == 0)
    }
}
