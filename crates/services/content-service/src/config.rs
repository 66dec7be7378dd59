//! Content service configuration.

use std::env;

use common::{DatabaseConfig, ServiceConfig};
use domain::PseudoRoleNames;

/// Content service configuration.
#[derive(Debug, Clone)]
pub struct ContentServiceConfig {
    /// Service name and log level
    pub service: ServiceConfig,
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Names of the Everyone / Registered / Anonymous pseudo-roles
    pub pseudo_roles: PseudoRoleNames,
}

impl ContentServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let database_defaults = DatabaseConfig::default();
        let role_defaults = PseudoRoleNames::default();

        Self {
            service: ServiceConfig {
                service_name: "content-service".to_string(),
                log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            },
            database: DatabaseConfig {
                url: env::var("CONTENT_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(database_defaults.url),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(database_defaults.max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(database_defaults.min_connections),
            },
            pseudo_roles: PseudoRoleNames {
                everyone: env::var("ROLE_EVERYONE_NAME").unwrap_or(role_defaults.everyone),
                registered: env::var("ROLE_REGISTERED_NAME").unwrap_or(role_defaults.registered),
                anonymous: env::var("ROLE_ANONYMOUS_NAME").unwrap_or(role_defaults.anonymous),
            },
        }
    }
}

impl Default for ContentServiceConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                service_name: "content-service".to_string(),
                log_level: "info".to_string(),
            },
            database: DatabaseConfig::default(),
            pseudo_roles: PseudoRoleNames::default(),
        }
    }
}
