//! Migration: Create menus, menu items and menu item localisations.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Menus::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Menus::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Menus::SiteId).uuid().not_null())
                    .col(ColumnDef::new(Menus::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Menus::Status)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MenuItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MenuItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(MenuItems::MenuId).uuid().not_null())
                    .col(ColumnDef::new(MenuItems::Text).string_len(255).not_null())
                    .col(
                        ColumnDef::new(MenuItems::Status)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_items_menu_id")
                            .from(MenuItems::Table, MenuItems::MenuId)
                            .to(Menus::Table, Menus::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MenuItemLocalisations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MenuItemLocalisations::MenuItemId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuItemLocalisations::LanguageId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuItemLocalisations::Text)
                            .string_len(255)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(MenuItemLocalisations::MenuItemId)
                            .col(MenuItemLocalisations::LanguageId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_item_localisations_menu_item_id")
                            .from(
                                MenuItemLocalisations::Table,
                                MenuItemLocalisations::MenuItemId,
                            )
                            .to(MenuItems::Table, MenuItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MenuItemLocalisations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MenuItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Menus::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Menus {
    Table,
    Id,
    SiteId,
    Name,
    Status,
}

#[derive(Iden)]
pub(super) enum MenuItems {
    Table,
    Id,
    MenuId,
    Text,
    Status,
}

#[derive(Iden)]
enum MenuItemLocalisations {
    Table,
    MenuItemId,
    LanguageId,
    Text,
}
