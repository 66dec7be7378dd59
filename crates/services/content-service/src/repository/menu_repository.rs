//! Menu repository with soft delete filtering.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::menu::{self, Entity as MenuEntity};
use super::entities::menu_item::{self, Entity as MenuItemEntity};
use super::entities::menu_item_localisation::{self, Entity as LocalisationEntity};
use super::entities::{MenuItemStatusColumn, MenuStatusColumn};
use super::{finish, mapper};
use common::{AppError, AppResult};
use domain::{Menu, MenuItem};

/// Menu repository trait for dependency injection.
///
/// Every read leaves out menu items whose status is Deleted. Deleted
/// menus are left out of site listings and name lookups only.
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Find menu by ID in any site
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Menu>>;

    /// Find menu by ID within a site
    async fn get_by_site_and_id(&self, site_id: Uuid, id: Uuid) -> AppResult<Option<Menu>>;

    /// Find a non-deleted menu by exact name within a site
    async fn get_by_name(&self, site_id: Uuid, name: &str) -> AppResult<Option<Menu>>;

    /// List non-deleted menus of a site, ordered by name
    async fn get_all(&self, site_id: Uuid) -> AppResult<Vec<Menu>>;

    /// Persist a new menu with its items and localisations
    async fn create(&self, menu: &Menu) -> AppResult<()>;

    /// Merge the menu graph into the stored one
    async fn update(&self, menu: &Menu) -> AppResult<()>;
}

/// Concrete implementation of MenuRepository
pub struct MenuStore {
    db: DatabaseConnection,
}

impl MenuStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Menu items that survive the soft delete filter.
///
/// All reads that return an aggregate load items through here.
fn active_menu_items() -> Select<MenuItemEntity> {
    MenuItemEntity::find().filter(menu_item::Column::Status.ne(MenuItemStatusColumn::Deleted))
}

/// Non-deleted menus of a site
fn site_menus(site_id: Uuid) -> Select<MenuEntity> {
    MenuEntity::find()
        .filter(menu::Column::SiteId.eq(site_id))
        .filter(menu::Column::Status.ne(MenuStatusColumn::Deleted))
}

/// Load active items and their localisations for the given menus.
///
/// Items come back in id order, localisations in language order.
async fn load_aggregates<C: ConnectionTrait>(
    db: &C,
    menus: Vec<menu::Model>,
) -> AppResult<Vec<Menu>> {
    if menus.is_empty() {
        return Ok(Vec::new());
    }

    let menu_ids: Vec<Uuid> = menus.iter().map(|m| m.id).collect();
    let items = active_menu_items()
        .filter(menu_item::Column::MenuId.is_in(menu_ids))
        .order_by_asc(menu_item::Column::Id)
        .all(db)
        .await?;

    let item_ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
    let localisations = if item_ids.is_empty() {
        Vec::new()
    } else {
        LocalisationEntity::find()
            .filter(menu_item_localisation::Column::MenuItemId.is_in(item_ids))
            .order_by_asc(menu_item_localisation::Column::LanguageId)
            .all(db)
            .await?
    };

    Ok(mapper::assemble_menus(menus, items, localisations))
}

async fn load_one<C: ConnectionTrait>(
    db: &C,
    menu: Option<menu::Model>,
) -> AppResult<Option<Menu>> {
    match menu {
        Some(model) => Ok(load_aggregates(db, vec![model]).await?.pop()),
        None => Ok(None),
    }
}

async fn insert_graph(txn: &DatabaseTransaction, menu: &Menu) -> AppResult<()> {
    MenuEntity::insert(mapper::menu_active_model(menu))
        .exec_without_returning(txn)
        .await?;

    let items: Vec<menu_item::ActiveModel> = menu
        .menu_items
        .iter()
        .map(mapper::menu_item_active_model)
        .collect();
    if !items.is_empty() {
        MenuItemEntity::insert_many(items)
            .exec_without_returning(txn)
            .await?;
    }

    let localisations: Vec<menu_item_localisation::ActiveModel> = menu
        .menu_items
        .iter()
        .flat_map(|item| item.menu_item_localisations.iter())
        .map(mapper::localisation_active_model)
        .collect();
    if !localisations.is_empty() {
        LocalisationEntity::insert_many(localisations)
            .exec_without_returning(txn)
            .await?;
    }

    Ok(())
}

async fn merge_graph(txn: &DatabaseTransaction, menu: &Menu) -> AppResult<()> {
    let stored = MenuEntity::find_by_id(menu.id)
        .filter(menu::Column::SiteId.eq(menu.site_id))
        .one(txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: menu::ActiveModel = stored.into();
    active.name = Set(menu.name.clone());
    active.status = Set(menu.status.into());
    active.update(txn).await?;

    // Deleted items included: a soft-deleted item may come back as Active
    let mut stored_items: HashMap<Uuid, menu_item::Model> = MenuItemEntity::find()
        .filter(menu_item::Column::MenuId.eq(menu.id))
        .all(txn)
        .await?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();

    for item in &menu.menu_items {
        match stored_items.remove(&item.id) {
            Some(existing) => {
                let mut active: menu_item::ActiveModel = existing.into();
                active.text = Set(item.text.clone());
                active.status = Set(item.status.into());
                active.update(txn).await?;
            }
            None => {
                MenuItemEntity::insert(mapper::menu_item_active_model(item))
                    .exec_without_returning(txn)
                    .await?;
            }
        }

        merge_localisations(txn, item).await?;
    }

    Ok(())
}

async fn merge_localisations(txn: &DatabaseTransaction, item: &MenuItem) -> AppResult<()> {
    let mut stored: HashMap<Uuid, menu_item_localisation::Model> = LocalisationEntity::find()
        .filter(menu_item_localisation::Column::MenuItemId.eq(item.id))
        .all(txn)
        .await?
        .into_iter()
        .map(|l| (l.language_id, l))
        .collect();

    for localisation in &item.menu_item_localisations {
        match stored.remove(&localisation.language_id) {
            Some(existing) => {
                if existing.text != localisation.text {
                    let mut active: menu_item_localisation::ActiveModel = existing.into();
                    active.text = Set(localisation.text.clone());
                    active.update(txn).await?;
                }
            }
            None => {
                LocalisationEntity::insert(mapper::localisation_active_model(localisation))
                    .exec_without_returning(txn)
                    .await?;
            }
        }
    }

    // Whatever is left is no longer part of the item
    let removed: HashSet<Uuid> = stored.into_keys().collect();
    if !removed.is_empty() {
        LocalisationEntity::delete_many()
            .filter(menu_item_localisation::Column::MenuItemId.eq(item.id))
            .filter(menu_item_localisation::Column::LanguageId.is_in(removed))
            .exec(txn)
            .await?;
    }

    Ok(())
}

#[async_trait]
impl MenuRepository for MenuStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Menu>> {
        tracing::debug!(menu_id = %id, "Loading menu");
        let model = MenuEntity::find_by_id(id).one(&self.db).await?;
        load_one(&self.db, model).await
    }

    async fn get_by_site_and_id(&self, site_id: Uuid, id: Uuid) -> AppResult<Option<Menu>> {
        tracing::debug!(site_id = %site_id, menu_id = %id, "Loading menu");
        let model = MenuEntity::find_by_id(id)
            .filter(menu::Column::SiteId.eq(site_id))
            .one(&self.db)
            .await?;
        load_one(&self.db, model).await
    }

    async fn get_by_name(&self, site_id: Uuid, name: &str) -> AppResult<Option<Menu>> {
        tracing::debug!(site_id = %site_id, name, "Loading menu by name");
        let model = site_menus(site_id)
            .filter(menu::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        load_one(&self.db, model).await
    }

    async fn get_all(&self, site_id: Uuid) -> AppResult<Vec<Menu>> {
        let models = site_menus(site_id)
            .order_by_asc(menu::Column::Name)
            .all(&self.db)
            .await?;
        tracing::debug!(site_id = %site_id, count = models.len(), "Loaded site menus");
        load_aggregates(&self.db, models).await
    }

    async fn create(&self, menu: &Menu) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let result = insert_graph(&txn, menu).await;
        finish(txn, result).await?;

        tracing::info!(menu_id = %menu.id, site_id = %menu.site_id, "Menu created");
        Ok(())
    }

    async fn update(&self, menu: &Menu) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let result = merge_graph(&txn, menu).await;
        finish(txn, result).await?;

        tracing::info!(menu_id = %menu.id, site_id = %menu.site_id, "Menu updated");
        Ok(())
    }
}
