//! Repository layer for data access.

pub mod entities;
mod identity_store;
mod mapper;
mod menu_repository;

use common::AppResult;
use sea_orm::DatabaseTransaction;

pub use identity_store::{IdentityManager, IdentityStore, RoleManager, UserPage};
pub use menu_repository::{MenuRepository, MenuStore};

#[cfg(any(test, feature = "test-utils"))]
pub use identity_store::{MockIdentityManager, MockRoleManager};

/// Commit on success, roll back otherwise.
async fn finish<T>(txn: DatabaseTransaction, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(e)
        }
    }
}
