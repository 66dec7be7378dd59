//! Menu aggregate: a menu, its items and their per-language texts.
//!
//! Removing an item or deleting a menu never drops data from the
//! aggregate. Both are soft deletes that flip the status to `Deleted`,
//! and the repository decides what read paths get to see.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MAX_MENU_ITEM_TEXT_LENGTH, MAX_MENU_NAME_LENGTH};
use crate::error::{DomainError, DomainResult};

/// Menu lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuStatus {
    Active,
    Deleted,
}

/// Menu item lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuItemStatus {
    Active,
    Deleted,
}

/// Text of a menu item in a single language.
///
/// Identified by `(menu_item_id, language_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemLocalisation {
    pub menu_item_id: Uuid,
    pub language_id: Uuid,
    pub text: String,
}

impl MenuItemLocalisation {
    pub fn new(menu_item_id: Uuid, language_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            menu_item_id,
            language_id,
            text: text.into(),
        }
    }
}

/// Localised text supplied when adding or updating a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalisationInput {
    pub language_id: Uuid,
    pub text: String,
}

impl LocalisationInput {
    pub fn new(language_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            language_id,
            text: text.into(),
        }
    }
}

/// Menu item owned by exactly one menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub text: String,
    pub status: MenuItemStatus,
    pub menu_item_localisations: Vec<MenuItemLocalisation>,
}

impl MenuItem {
    pub fn is_deleted(&self) -> bool {
        self.status == MenuItemStatus::Deleted
    }

    /// Localised text for a language, if one is set.
    pub fn localised_text(&self, language_id: Uuid) -> Option<&str> {
        self.menu_item_localisations
            .iter()
            .find(|l| l.language_id == language_id)
            .map(|l| l.text.as_str())
    }
}

/// Menu aggregate root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub id: Uuid,
    pub site_id: Uuid,
    pub name: String,
    pub status: MenuStatus,
    pub menu_items: Vec<MenuItem>,
}

impl Menu {
    /// Create an active menu with no items
    pub fn new(site_id: Uuid, id: Uuid, name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        validate_name(&name)?;

        Ok(Self {
            id,
            site_id,
            name,
            status: MenuStatus::Active,
            menu_items: Vec::new(),
        })
    }

    pub fn is_deleted(&self) -> bool {
        self.status == MenuStatus::Deleted
    }

    /// Items not soft-deleted
    pub fn active_menu_items(&self) -> impl Iterator<Item = &MenuItem> {
        self.menu_items.iter().filter(|item| !item.is_deleted())
    }

    pub fn rename(&mut self, name: impl Into<String>) -> DomainResult<()> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Append a new active item to the menu.
    pub fn add_menu_item(
        &mut self,
        id: Uuid,
        text: impl Into<String>,
        localisations: Vec<LocalisationInput>,
    ) -> DomainResult<&MenuItem> {
        if self.menu_items.iter().any(|item| item.id == id) {
            return Err(DomainError::conflict(format!("Menu item {}", id)));
        }

        let text = text.into();
        validate_item_text(&text)?;
        let menu_item_localisations = build_localisations(id, localisations)?;

        self.menu_items.push(MenuItem {
            id,
            menu_id: self.id,
            text,
            status: MenuItemStatus::Active,
            menu_item_localisations,
        });

        Ok(&self.menu_items[self.menu_items.len() - 1])
    }

    /// Replace text and localisations of an active item.
    pub fn update_menu_item(
        &mut self,
        id: Uuid,
        text: impl Into<String>,
        localisations: Vec<LocalisationInput>,
    ) -> DomainResult<()> {
        let text = text.into();
        validate_item_text(&text)?;
        let menu_item_localisations = build_localisations(id, localisations)?;

        let item = self.active_item_mut(id)?;
        item.text = text;
        item.menu_item_localisations = menu_item_localisations;
        Ok(())
    }

    /// Soft delete an item. It stays in the aggregate with status `Deleted`.
    pub fn remove_menu_item(&mut self, id: Uuid) -> DomainResult<()> {
        let item = self.active_item_mut(id)?;
        item.status = MenuItemStatus::Deleted;
        Ok(())
    }

    /// Soft delete the whole menu
    pub fn delete(&mut self) -> DomainResult<()> {
        if self.is_deleted() {
            return Err(DomainError::validation("Menu is already deleted"));
        }
        self.status = MenuStatus::Deleted;
        Ok(())
    }

    fn active_item_mut(&mut self, id: Uuid) -> DomainResult<&mut MenuItem> {
        self.menu_items
            .iter_mut()
            .find(|item| item.id == id && !item.is_deleted())
            .ok_or_else(|| DomainError::not_found(format!("Menu item {}", id)))
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("Menu name is required"));
    }
    if name.chars().count() > MAX_MENU_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "Menu name must be at most {} characters",
            MAX_MENU_NAME_LENGTH
        )));
    }
    Ok(())
}

fn validate_item_text(text: &str) -> DomainResult<()> {
    if text.trim().is_empty() {
        return Err(DomainError::validation("Menu item text is required"));
    }
    if text.chars().count() > MAX_MENU_ITEM_TEXT_LENGTH {
        return Err(DomainError::validation(format!(
            "Menu item text must be at most {} characters",
            MAX_MENU_ITEM_TEXT_LENGTH
        )));
    }
    Ok(())
}

fn build_localisations(
    menu_item_id: Uuid,
    inputs: Vec<LocalisationInput>,
) -> DomainResult<Vec<MenuItemLocalisation>> {
    let mut localisations: Vec<MenuItemLocalisation> = Vec::with_capacity(inputs.len());

    for input in inputs {
        if localisations.iter().any(|l| l.language_id == input.language_id) {
            return Err(DomainError::conflict(format!(
                "Localisation for language {}",
                input.language_id
            )));
        }
        if input.text.chars().count() > MAX_MENU_ITEM_TEXT_LENGTH {
            return Err(DomainError::validation(format!(
                "Localised text must be at most {} characters",
                MAX_MENU_ITEM_TEXT_LENGTH
            )));
        }
        localisations.push(MenuItemLocalisation::new(
            menu_item_id,
            input.language_id,
            input.text,
        ));
    }

    Ok(localisations)
}
