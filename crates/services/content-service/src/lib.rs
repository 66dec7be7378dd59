//! Content Service Library
//!
//! Site menus and user administration for the content backend. The
//! binary in `main.rs` is a thin administrative CLI over this crate.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use domain::PseudoRoleNames;
use sea_orm::{DatabaseConnection, DbErr};
use tracing::info;

use crate::config::ContentServiceConfig;
use crate::infra::Database;
use crate::repository::{IdentityStore, MenuRepository, MenuStore, RoleManager};
use crate::service::{UserAdmin, UserService};

/// The wired-up repositories and services of one database.
#[derive(Clone)]
pub struct ContentServices {
    pub menus: Arc<dyn MenuRepository>,
    pub users: Arc<dyn UserService>,
    pub roles: Arc<dyn RoleManager>,
}

impl ContentServices {
    /// Connect, apply pending migrations and build the services.
    pub async fn connect(config: &ContentServiceConfig) -> Result<Self, DbErr> {
        let db = Database::connect(&config.database).await?;
        Ok(Self::from_connection(
            db.get_connection(),
            config.pseudo_roles.clone(),
        ))
    }

    pub fn from_connection(conn: DatabaseConnection, pseudo_roles: PseudoRoleNames) -> Self {
        let identity = Arc::new(IdentityStore::new(conn.clone()));
        let users = Arc::new(UserAdmin::new(identity.clone(), identity.clone(), pseudo_roles));

        Self {
            menus: Arc::new(MenuStore::new(conn)),
            users,
            roles: identity,
        }
    }
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &ContentServiceConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
