use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::utils::{AppError, AppResult};

/// Shared server state - one instance constructed at startup
///
/// Holds the shared handles every handler needs. `Clone` is shallow: the
/// database handle and the JWT service are reference counted. No component
/// reaches for package-level singletons; everything flows through this
/// struct.
///
/// | Field | Description |
/// |-------|-------------|
/// | config | server configuration (immutable) |
/// | db | embedded SurrealDB store handle |
/// | jwt | JWT token service |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, db: DbService, jwt: Arc<JwtService>) -> Self {
        Self { config, db, jwt }
    }

    /// Initialize the server state: work directory, database, JWT service
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            AppError::internal(format!(
                "Failed to create work directory {}: {e}",
                config.work_dir
            ))
        })?;

        let db_path = config.database_path();
        let db = DbService::open(
            &db_path.to_string_lossy(),
            config.store_read_timeout,
            config.store_write_timeout,
        )
        .await?;

        let jwt = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self::new(config.clone(), db, jwt))
    }

    /// In-memory state for tests and local experiments
    pub async fn in_memory(config: Config) -> AppResult<Self> {
        let db = DbService::memory(config.store_read_timeout, config.store_write_timeout).await?;
        let jwt = Arc::new(JwtService::with_config(config.jwt.clone()));
        Ok(Self::new(config, db, jwt))
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
