//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the menu aggregate, identity records and outcomes, and the
//! role-based authorization rules shared by every service.

pub mod authorization;
pub mod constants;
pub mod error;
pub mod identity;
pub mod menu;
pub mod user;

pub use authorization::{is_authorized, ClaimsPrincipal, Principal, PseudoRole, PseudoRoleNames};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use identity::{IdentityError, IdentityResult, NewUser, UserRules};
pub use menu::{
    LocalisationInput, Menu, MenuItem, MenuItemLocalisation, MenuItemStatus, MenuStatus,
};
pub use user::{Role, User};
