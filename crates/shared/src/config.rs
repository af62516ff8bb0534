//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Audit trail configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Audit trail configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Maximum page size served by audit queries.
    #[serde(default = "default_audit_max_page_size")]
    pub max_page_size: u32,
}

fn default_audit_max_page_size() -> u32 {
    100
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            max_page_size: default_audit_max_page_size(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        // Pick up a local .env file before reading the environment.
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PATUNGAN").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_defaults() {
        let config: DatabaseConfig =
            serde_json::from_str(r#"{"url": "postgres://localhost/patungan"}"#).unwrap();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
    }

    #[test]
    fn test_audit_defaults() {
        let config = AuditConfig::default();
        assert_eq!(config.max_page_size, 100);
    }
}
