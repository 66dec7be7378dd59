//! Service layer - Business logic.

mod user_service;

pub use user_service::{UserAdmin, UserRolesView, UserService, UsersQuery, UsersView};
