//! Repository Module
//!
//! CRUD operations per entity table. Every store call is bounded by the
//! configured deadline: 10s for simple reads, 100s for writes and
//! aggregation fetches. Deadlines expire into [`RepoError::Timeout`]; no
//! retry is performed at this layer.

pub mod food;
pub mod invoice;
pub mod menu;
pub mod order;
pub mod order_item;
pub mod table;
pub mod user;

// Re-exports
pub use food::FoodRepository;
pub use invoice::InvoiceRepository;
pub use menu::MenuRepository;
pub use order::OrderRepository;
pub use order_item::OrderItemRepository;
pub use table::DiningTableRepository;
pub use user::UserRepository;

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::db::DbService;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store deadline exceeded during {0}")]
    Timeout(&'static str),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Row shape of `SELECT count() AS total ... GROUP ALL`
#[derive(Debug, Deserialize)]
pub struct CountRow {
    pub total: i64,
}

/// Decode a full result set, treating failure as data corruption.
///
/// A collection that no longer deserializes into its model is an integrity
/// error, not a request error: log and exit instead of serving partial data.
/// Single-row lookups keep ordinary error propagation.
pub fn decode_rows<T>(res: Result<Vec<T>, surrealdb::Error>, table: &str) -> Vec<T> {
    match res {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(
                target: "database",
                table,
                error = %e,
                "Row decode failed - store corruption, aborting"
            );
            std::process::exit(1);
        }
    }
}

/// Base repository with the shared store handle and deadlines
#[derive(Clone)]
pub struct BaseRepository {
    db: DbService,
}

impl BaseRepository {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db.db
    }

    /// Run a read with the read deadline applied
    pub async fn read<T, F>(&self, fut: F) -> RepoResult<T>
    where
        F: Future<Output = RepoResult<T>>,
    {
        match tokio::time::timeout(self.db.read_timeout, fut).await {
            Ok(res) => res,
            Err(_) => Err(RepoError::Timeout("read")),
        }
    }

    /// Run a write or aggregation fetch with the write deadline applied
    pub async fn write<T, F>(&self, fut: F) -> RepoResult<T>
    where
        F: Future<Output = RepoResult<T>>,
    {
        match tokio::time::timeout(self.db.write_timeout, fut).await {
            Ok(res) => res,
            Err(_) => Err(RepoError::Timeout("write")),
        }
    }
}
