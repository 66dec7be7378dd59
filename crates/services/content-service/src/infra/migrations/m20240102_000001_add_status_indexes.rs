//! Migration: Index the status columns behind the soft-delete filter.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_menu_tables::{MenuItems, Menus};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Site listings skip deleted menus
        manager
            .create_index(
                Index::create()
                    .name("idx_menus_site_id_status")
                    .table(Menus::Table)
                    .col(Menus::SiteId)
                    .col(Menus::Status)
                    .to_owned(),
            )
            .await?;

        // Every menu read skips deleted items
        manager
            .create_index(
                Index::create()
                    .name("idx_menu_items_menu_id_status")
                    .table(MenuItems::Table)
                    .col(MenuItems::MenuId)
                    .col(MenuItems::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_menu_items_menu_id_status")
                    .table(MenuItems::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_menus_site_id_status")
                    .table(Menus::Table)
                    .to_owned(),
            )
            .await
    }
}
