//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod menu;
pub mod menu_item;
pub mod menu_item_localisation;
pub mod role;
pub mod user;
pub mod user_role;

mod status;

pub use status::{MenuItemStatusColumn, MenuStatusColumn};
