//! Configuration management for the Wholesale Business Management Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WBM_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Report thresholds
    pub reports: ReportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiration in seconds
    pub refresh_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// A product whose total stock falls below this is flagged low-stock
    pub low_stock_threshold: i64,

    /// Days without sales before a product counts as dead stock
    pub dead_stock_window_days: i64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("WBM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.access_token_expiry", 3600)?
            .set_default("jwt.refresh_token_expiry", 604800)?
            .set_default("reports.low_stock_threshold", 10)?
            .set_default("reports.dead_stock_window_days", 180)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WBM_ prefix)
            .add_source(
                Environment::with_prefix("WBM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 10,
            dead_stock_window_days: 180,
        }
    }
}
