use std::path::PathBuf;
use std::time::Duration;

use crate::auth::JwtConfig;

/// Server configuration
///
/// Every setting can be overridden through environment variables:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | ./data | working directory (database, logs) |
/// | HTTP_PORT | 8000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | STORE_READ_TIMEOUT_MS | 10000 | deadline for simple store reads |
/// | STORE_WRITE_TIMEOUT_MS | 100000 | deadline for store writes and aggregations |
/// | SECRET_KEY | (generated in dev) | JWT signing secret |
/// | SESSION_TTL_MINUTES | 15 | session token lifetime |
/// | REFRESH_TTL_DAYS | 7 | refresh token lifetime |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the database files and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// JWT signing configuration
    pub jwt: JwtConfig,
    /// Deadline for simple store reads
    pub store_read_timeout: Duration,
    /// Deadline for store writes and aggregation queries
    pub store_write_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            jwt: JwtConfig::default(),
            store_read_timeout: Duration::from_millis(
                std::env::var("STORE_READ_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10_000),
            ),
            store_write_timeout: Duration::from_millis(
                std::env::var("STORE_WRITE_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(100_000),
            ),
        }
    }

    /// Path of the embedded database directory
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("resto.db")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
