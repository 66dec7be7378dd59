//! Identity operation outcomes and the user-uniqueness rules.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{ERROR_INVALID_EMAIL, ERROR_INVALID_USER_NAME};

/// A single reason an identity operation was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityError {
    pub code: String,
    pub description: String,
}

impl IdentityError {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// Outcome of a mutating identity operation.
///
/// A rejected operation is not an infrastructure failure: the store
/// answered, it just refused.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdentityResult {
    errors: Vec<IdentityError>,
}

impl IdentityResult {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn failed(errors: Vec<IdentityError>) -> Self {
        Self { errors }
    }

    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[IdentityError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<IdentityError> {
        self.errors
    }
}

/// Data needed to register a user with the identity store
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 256, message = "User name must be between 1 and 256 characters"))]
    pub user_name: String,
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
}

impl NewUser {
    /// A user whose user name is its email address
    pub fn from_email(email: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            user_name: email.clone(),
            email,
        }
    }

    /// Format errors as identity errors, user name first
    pub fn validation_errors(&self) -> Vec<IdentityError> {
        let Err(errors) = self.validate() else {
            return Vec::new();
        };

        let field_errors = errors.field_errors();
        let mut result = Vec::new();

        for (field, code) in [
            ("user_name", ERROR_INVALID_USER_NAME),
            ("email", ERROR_INVALID_EMAIL),
        ] {
            if let Some(errs) = field_errors.get(field) {
                for e in errs.iter() {
                    let description = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field));
                    result.push(IdentityError::new(code, description));
                }
            }
        }

        result
    }
}

/// Uniqueness rules for user names and emails.
///
/// `except_user_id` excludes the given user from the check so an
/// existing user can keep its own name or email.
#[async_trait]
pub trait UserRules: Send + Sync {
    type Error;

    async fn is_user_name_unique(
        &self,
        name: &str,
        except_user_id: Option<Uuid>,
    ) -> Result<bool, Self::Error>;

    async fn is_user_email_unique(
        &self,
        email: &str,
        except_user_id: Option<Uuid>,
    ) -> Result<bool, Self::Error>;
}
