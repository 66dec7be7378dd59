//! Status columns stored as small integers.

use sea_orm::entity::prelude::*;

use domain::{MenuItemStatus, MenuStatus};

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
pub enum MenuStatusColumn {
    #[sea_orm(num_value = 0)]
    Active,
    #[sea_orm(num_value = 1)]
    Deleted,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
pub enum MenuItemStatusColumn {
    #[sea_orm(num_value = 0)]
    Active,
    #[sea_orm(num_value = 1)]
    Deleted,
}

impl From<MenuStatusColumn> for MenuStatus {
    fn from(status: MenuStatusColumn) -> Self {
        match status {
            MenuStatusColumn::Active => MenuStatus::Active,
            MenuStatusColumn::Deleted => MenuStatus::Deleted,
        }
    }
}

impl From<MenuStatus> for MenuStatusColumn {
    fn from(status: MenuStatus) -> Self {
        match status {
            MenuStatus::Active => MenuStatusColumn::Active,
            MenuStatus::Deleted => MenuStatusColumn::Deleted,
        }
    }
}

impl From<MenuItemStatusColumn> for MenuItemStatus {
    fn from(status: MenuItemStatusColumn) -> Self {
        match status {
            MenuItemStatusColumn::Active => MenuItemStatus::Active,
            MenuItemStatusColumn::Deleted => MenuItemStatus::Deleted,
        }
    }
}

impl From<MenuItemStatus> for MenuItemStatusColumn {
    fn from(status: MenuItemStatus) -> Self {
        match status {
            MenuItemStatus::Active => MenuItemStatusColumn::Active,
            MenuItemStatus::Deleted => MenuItemStatusColumn::Deleted,
        }
    }
}
