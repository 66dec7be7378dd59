//! Menu item database entity for SeaORM.

use sea_orm::entity::prelude::*;

use super::MenuItemStatusColumn;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "menu_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub menu_id: Uuid,
    pub text: String,
    /// Soft delete marker (Deleted rows stay in the table)
    pub status: MenuItemStatusColumn,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::menu::Entity",
        from = "Column::MenuId",
        to = "super::menu::Column::Id",
        on_delete = "Cascade"
    )]
    Menu,
    #[sea_orm(has_many = "super::menu_item_localisation::Entity")]
    Localisations,
}

impl Related<super::menu::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Menu.def()
    }
}

impl Related<super::menu_item_localisation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Localisations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
