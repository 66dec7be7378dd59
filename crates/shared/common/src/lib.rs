//! Common utilities shared across all services.
//!
//! This crate provides:
//! - Unified error handling
//! - Configuration structures
//! - Paging arithmetic for list views

pub mod config;
pub mod error;
pub mod pagination;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
pub use pagination::page_count;
