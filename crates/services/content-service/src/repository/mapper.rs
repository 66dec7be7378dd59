//! Conversion between persistence rows and the menu aggregate.

use std::collections::HashMap;

use sea_orm::Set;
use uuid::Uuid;

use domain::{Menu, MenuItem, MenuItemLocalisation};

use super::entities::{menu, menu_item, menu_item_localisation};

impl From<menu_item_localisation::Model> for MenuItemLocalisation {
    fn from(model: menu_item_localisation::Model) -> Self {
        MenuItemLocalisation {
            menu_item_id: model.menu_item_id,
            language_id: model.language_id,
            text: model.text,
        }
    }
}

/// Assemble aggregates from already-filtered rows.
///
/// Menus keep the order they were given in. Items and localisations
/// without an owner in the input are dropped.
pub(crate) fn assemble_menus(
    menus: Vec<menu::Model>,
    items: Vec<menu_item::Model>,
    localisations: Vec<menu_item_localisation::Model>,
) -> Vec<Menu> {
    let mut localisations_by_item: HashMap<Uuid, Vec<MenuItemLocalisation>> = HashMap::new();
    for localisation in localisations {
        localisations_by_item
            .entry(localisation.menu_item_id)
            .or_default()
            .push(localisation.into());
    }

    let mut items_by_menu: HashMap<Uuid, Vec<MenuItem>> = HashMap::new();
    for item in items {
        let menu_item_localisations = localisations_by_item.remove(&item.id).unwrap_or_default();
        items_by_menu.entry(item.menu_id).or_default().push(MenuItem {
            id: item.id,
            menu_id: item.menu_id,
            text: item.text,
            status: item.status.into(),
            menu_item_localisations,
        });
    }

    menus
        .into_iter()
        .map(|model| Menu {
            menu_items: items_by_menu.remove(&model.id).unwrap_or_default(),
            id: model.id,
            site_id: model.site_id,
            name: model.name,
            status: model.status.into(),
        })
        .collect()
}

pub(crate) fn menu_active_model(menu: &Menu) -> menu::ActiveModel {
    menu::ActiveModel {
        id: Set(menu.id),
        site_id: Set(menu.site_id),
        name: Set(menu.name.clone()),
        status: Set(menu.status.into()),
    }
}

pub(crate) fn menu_item_active_model(item: &MenuItem) -> menu_item::ActiveModel {
    menu_item::ActiveModel {
        id: Set(item.id),
        menu_id: Set(item.menu_id),
        text: Set(item.text.clone()),
        status: Set(item.status.into()),
    }
}

pub(crate) fn localisation_active_model(
    localisation: &MenuItemLocalisation,
) -> menu_item_localisation::ActiveModel {
    menu_item_localisation::ActiveModel {
        menu_item_id: Set(localisation.menu_item_id),
        language_id: Set(localisation.language_id),
        text: Set(localisation.text.clone()),
    }
}
