//! Unified error handling.
//!
//! Provides a single error type for every service, with a stable
//! machine-readable code per kind so callers never have to inspect
//! message text.

use domain::{DomainError, IdentityError};
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("User Not Found.")]
    UserNotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Identity store rejected the operation
    #[error("{}", join_descriptions(.0))]
    Identity(Vec<IdentityError>),

    // Validation
    #[error("{0}")]
    Validation(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),
}

fn join_descriptions(errors: &[IdentityError]) -> String {
    errors
        .iter()
        .map(|e| e.description.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Identity(_) => "IDENTITY_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Identity errors reported by the store, if this is an identity failure
    pub fn identity_errors(&self) -> &[IdentityError] {
        match self {
            AppError::Identity(errors) => errors,
            _ => &[],
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),

            // Hide details for internal errors
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NotFound(_) => AppError::NotFound,
            DomainError::Conflict(msg) => AppError::Conflict(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;

    fn ok_or_user_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }

    fn ok_or_user_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::UserNotFound)
    }
}
