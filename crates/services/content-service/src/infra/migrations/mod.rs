//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_menu_tables;
mod m20240101_000002_create_identity_tables;
mod m20240102_000001_add_status_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_menu_tables::Migration),
            Box::new(m20240101_000002_create_identity_tables::Migration),
            Box::new(m20240102_000001_add_status_indexes::Migration),
        ]
    }
}
