//! Dining Table Repository

use chrono::Utc;

use super::{BaseRepository, RepoError, RepoResult, decode_rows};
use crate::db::DbService;
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate, new_public_id};

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: DbService) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<DiningTable>> {
        self.base
            .read(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM dining_table ORDER BY table_number")
                    .await?;
                Ok(decode_rows(result.take(0), TABLE))
            })
            .await
    }

    pub async fn find_by_table_id(&self, table_id: &str) -> RepoResult<Option<DiningTable>> {
        let table_id = table_id.to_string();
        self.base
            .read(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM dining_table WHERE table_id = $table_id LIMIT 1")
                    .bind(("table_id", table_id))
                    .await?;
                let tables: Vec<DiningTable> = result.take(0)?;
                Ok(tables.into_iter().next())
            })
            .await
    }

    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        let now = Utc::now();
        let table = DiningTable {
            id: None,
            table_id: new_public_id(),
            table_number: data.table_number,
            number_of_guests: data.number_of_guests,
            created_at: now,
            updated_at: now,
        };

        self.base
            .write(async {
                let created: Option<DiningTable> =
                    self.base.db().create(TABLE).content(table).await?;
                created.ok_or_else(|| RepoError::Database("Failed to create table".to_string()))
            })
            .await
    }

    pub async fn update(&self, table_id: &str, data: DiningTableUpdate) -> RepoResult<DiningTable> {
        let existing = self
            .find_by_table_id(table_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", table_id)))?;

        let thing = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Table record missing internal id".to_string()))?;

        let table_number = data.table_number.unwrap_or(existing.table_number);
        let number_of_guests = data.number_of_guests.unwrap_or(existing.number_of_guests);
        let updated_at = Utc::now();

        self.base
            .write(async {
                let mut result = self
                    .base
                    .db()
                    .query(
                        "UPDATE $thing SET table_number = $table_number, \
                         number_of_guests = $number_of_guests, updated_at = $updated_at \
                         RETURN AFTER",
                    )
                    .bind(("thing", thing))
                    .bind(("table_number", table_number))
                    .bind(("number_of_guests", number_of_guests))
                    .bind(("updated_at", updated_at))
                    .await?;
                let updated: Vec<DiningTable> = result.take(0)?;
                updated
                    .into_iter()
                    .next()
                    .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", table_id)))
            })
            .await
    }
}
