//! Order Repository

use chrono::Utc;

use super::{BaseRepository, RepoError, RepoResult, decode_rows};
use crate::db::DbService;
use crate::db::models::{Order, OrderCreate, OrderUpdate, new_public_id};

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: DbService) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        self.base
            .read(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM order ORDER BY created_at")
                    .await?;
                Ok(decode_rows(result.take(0), TABLE))
            })
            .await
    }

    pub async fn find_by_order_id(&self, order_id: &str) -> RepoResult<Option<Order>> {
        let order_id = order_id.to_string();
        self.base
            .read(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM order WHERE order_id = $order_id LIMIT 1")
                    .bind(("order_id", order_id))
                    .await?;
                let orders: Vec<Order> = result.take(0)?;
                Ok(orders.into_iter().next())
            })
            .await
    }

    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        let now = Utc::now();
        let order = Order {
            id: None,
            order_id: new_public_id(),
            table_id: data.table_id,
            order_date: now,
            created_at: now,
            updated_at: now,
        };

        self.base
            .write(async {
                let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
                created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
            })
            .await
    }

    pub async fn update(&self, order_id: &str, data: OrderUpdate) -> RepoResult<Order> {
        let existing = self
            .find_by_order_id(order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order_id)))?;

        let thing = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Order record missing internal id".to_string()))?;

        let table_id = match data.table_id {
            Some(table_id) => Some(table_id),
            None => existing.table_id,
        };
        let updated_at = Utc::now();

        self.base
            .write(async {
                let mut result = self
                    .base
                    .db()
                    .query(
                        "UPDATE $thing SET table_id = $table_id, updated_at = $updated_at \
                         RETURN AFTER",
                    )
                    .bind(("thing", thing))
                    .bind(("table_id", table_id))
                    .bind(("updated_at", updated_at))
                    .await?;
                let updated: Vec<Order> = result.take(0)?;
                updated
                    .into_iter()
                    .next()
                    .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order_id)))
            })
            .await
    }
}
