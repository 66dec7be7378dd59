//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Pseudo-roles
// =============================================================================

/// Default name of the pseudo-role every principal satisfies
pub const DEFAULT_EVERYONE_ROLE_NAME: &str = "Everyone";

/// Default name of the pseudo-role reserved for registered users
pub const DEFAULT_REGISTERED_ROLE_NAME: &str = "Registered";

/// Default name of the pseudo-role satisfied by unauthenticated principals
pub const DEFAULT_ANONYMOUS_ROLE_NAME: &str = "Anonymous";

// =============================================================================
// Identity error codes
// =============================================================================

pub const ERROR_INVALID_EMAIL: &str = "InvalidEmail";
pub const ERROR_INVALID_USER_NAME: &str = "InvalidUserName";
pub const ERROR_DUPLICATE_USER_NAME: &str = "DuplicateUserName";
pub const ERROR_DUPLICATE_EMAIL: &str = "DuplicateEmail";
pub const ERROR_ROLE_NOT_FOUND: &str = "RoleNotFound";
pub const ERROR_USER_ALREADY_IN_ROLE: &str = "UserAlreadyInRole";
pub const ERROR_USER_NOT_IN_ROLE: &str = "UserNotInRole";
pub const ERROR_INVALID_ROLE_NAME: &str = "InvalidRoleName";
pub const ERROR_DUPLICATE_ROLE_NAME: &str = "DuplicateRoleName";

// =============================================================================
// Validation
// =============================================================================

/// Maximum length of a menu name
pub const MAX_MENU_NAME_LENGTH: usize = 100;

/// Maximum length of a menu item text (default or localised)
pub const MAX_MENU_ITEM_TEXT_LENGTH: usize = 255;

/// Maximum length of a role name
pub const MAX_ROLE_NAME_LENGTH: usize = 256;
