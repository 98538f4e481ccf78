use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub table: TableDefaults,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub storage: StorageBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Where entity rows live. `Memory` keeps everything in-process and is meant
/// for local development and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Defaults applied to every list view built by the HTTP layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDefaults {
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub page_sizes: Vec<usize>,
    pub debug_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub admin_role: String,
    pub jwt_expiry_hours: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Table overrides
        if let Ok(v) = env::var("TABLE_DEFAULT_PAGE_SIZE") {
            self.table.default_page_size = v.parse().unwrap_or(self.table.default_page_size);
        }
        if let Ok(v) = env::var("TABLE_MAX_PAGE_SIZE") {
            self.table.max_page_size = v.parse().unwrap_or(self.table.max_page_size);
        }
        if let Ok(v) = env::var("TABLE_PAGE_SIZES") {
            let sizes: Vec<usize> = v.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if !sizes.is_empty() {
                self.table.page_sizes = sizes;
            }
        }
        if let Ok(v) = env::var("TABLE_DEBUG_LOGGING") {
            self.table.debug_logging = v.parse().unwrap_or(self.table.debug_logging);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }

        // API overrides
        if let Some(port) = env::var("CMS_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_ADMIN_ROLE") {
            self.security.admin_role = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        // Storage override
        match env::var("STORAGE_BACKEND").as_deref() {
            Ok("memory") => self.storage = StorageBackend::Memory,
            Ok("postgres") | Ok("pg") => self.storage = StorageBackend::Postgres,
            _ => {}
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            table: TableDefaults {
                default_page_size: 10,
                max_page_size: 100,
                page_sizes: vec![10, 25, 50, 100],
                debug_logging: true,
            },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
                enable_query_logging: true,
            },
            api: ApiConfig { port: 3000 },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                jwt_secret: "dev-secret-change-me".to_string(),
                admin_role: "admin".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
            },
            storage: StorageBackend::Memory,
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            table: TableDefaults {
                default_page_size: 10,
                max_page_size: 100,
                page_sizes: vec![10, 25, 50, 100],
                debug_logging: false,
            },
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
                enable_query_logging: true,
            },
            api: ApiConfig { port: 3000 },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                jwt_secret: String::new(),
                admin_role: "admin".to_string(),
                jwt_expiry_hours: 24,
            },
            storage: StorageBackend::Postgres,
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            table: TableDefaults {
                default_page_size: 10,
                max_page_size: 50,
                page_sizes: vec![10, 25, 50],
                debug_logging: false,
            },
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
                enable_query_logging: false,
            },
            api: ApiConfig { port: 3000 },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                jwt_secret: String::new(),
                admin_role: "admin".to_string(),
                jwt_expiry_hours: 4,
            },
            storage: StorageBackend::Postgres,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.table.default_page_size, 10);
        assert_eq!(config.table.page_sizes, vec![10, 25, 50, 100]);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.table.max_page_size, 50);
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert!(config.security.jwt_secret.is_empty());
    }
}
