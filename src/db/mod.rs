//! Database Module
//!
//! Embedded SurrealDB store: one table per entity kind, accessed through the
//! repository layer.

pub mod models;
pub mod repository;

use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "resto";
const DATABASE: &str = "resto";

/// Database service: owns the embedded store handle and the per-operation
/// deadlines the repositories enforce.
#[derive(Clone, Debug)]
pub struct DbService {
    pub db: Surreal<Db>,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl DbService {
    /// Open a persistent RocksDB-backed store at the given path
    pub async fn open(
        path: &str,
        read_timeout: Duration,
        write_timeout: Duration,
    ) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database at {path}: {e}")))?;
        Self::select_ns(&db).await?;

        tracing::info!("Database opened at {}", path);

        Ok(Self {
            db,
            read_timeout,
            write_timeout,
        })
    }

    /// Open a fresh in-memory store (tests, local experiments)
    pub async fn memory(read_timeout: Duration, write_timeout: Duration) -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::select_ns(&db).await?;

        Ok(Self {
            db,
            read_timeout,
            write_timeout,
        })
    }

    async fn select_ns(db: &Surreal<Db>) -> Result<(), AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))
    }
}
