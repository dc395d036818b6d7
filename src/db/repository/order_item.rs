//! Order Item Repository

use chrono::Utc;

use super::{BaseRepository, RepoError, RepoResult, decode_rows};
use crate::db::DbService;
use crate::db::models::{OrderItem, OrderItemCreate, OrderItemUpdate, new_public_id};
use crate::utils::to_fixed_2;

const TABLE: &str = "order_item";

#[derive(Clone)]
pub struct OrderItemRepository {
    base: BaseRepository,
}

impl OrderItemRepository {
    pub fn new(db: DbService) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<OrderItem>> {
        self.base
            .read(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM order_item ORDER BY created_at")
                    .await?;
                Ok(decode_rows(result.take(0), TABLE))
            })
            .await
    }

    pub async fn find_by_order_item_id(
        &self,
        order_item_id: &str,
    ) -> RepoResult<Option<OrderItem>> {
        let order_item_id = order_item_id.to_string();
        self.base
            .read(async {
                let mut result = self
                    .base
                    .db()
                    .query(
                        "SELECT * FROM order_item WHERE order_item_id = $order_item_id LIMIT 1",
                    )
                    .bind(("order_item_id", order_item_id))
                    .await?;
                let items: Vec<OrderItem> = result.take(0)?;
                Ok(items.into_iter().next())
            })
            .await
    }

    pub async fn find_by_order(&self, order_id: &str) -> RepoResult<Vec<OrderItem>> {
        let order_id = order_id.to_string();
        self.base
            .read(async {
                let mut result = self
                    .base
                    .db()
                    .query(
                        "SELECT * FROM order_item WHERE order_id = $order_id ORDER BY created_at",
                    )
                    .bind(("order_id", order_id))
                    .await?;
                Ok(decode_rows(result.take(0), TABLE))
            })
            .await
    }

    pub async fn create(&self, order_id: &str, data: OrderItemCreate) -> RepoResult<OrderItem> {
        let now = Utc::now();
        let item = OrderItem {
            id: None,
            order_item_id: new_public_id(),
            order_id: order_id.to_string(),
            food_id: data.food_id,
            quantity: data.quantity,
            unit_price: to_fixed_2(data.unit_price),
            created_at: now,
            updated_at: now,
        };

        self.base
            .write(async {
                let created: Option<OrderItem> =
                    self.base.db().create(TABLE).content(item).await?;
                created
                    .ok_or_else(|| RepoError::Database("Failed to create order item".to_string()))
            })
            .await
    }

    /// Batch insert for a pack of items under one order. The items land in a
    /// single statement so a pack is all-or-nothing.
    pub async fn insert_many(
        &self,
        order_id: &str,
        items: Vec<OrderItemCreate>,
    ) -> RepoResult<Vec<OrderItem>> {
        let now = Utc::now();
        let rows: Vec<OrderItem> = items
            .into_iter()
            .map(|data| OrderItem {
                id: None,
                order_item_id: new_public_id(),
                order_id: order_id.to_string(),
                food_id: data.food_id,
                quantity: data.quantity,
                unit_price: to_fixed_2(data.unit_price),
                created_at: now,
                updated_at: now,
            })
            .collect();

        self.base
            .write(async {
                let created: Vec<OrderItem> = self.base.db().insert(TABLE).content(rows).await?;
                Ok(created)
            })
            .await
    }

    pub async fn update(
        &self,
        order_item_id: &str,
        data: OrderItemUpdate,
    ) -> RepoResult<OrderItem> {
        let existing = self
            .find_by_order_item_id(order_item_id)
            .await?
            .ok_or_else(|| {
                RepoError::NotFound(format!("Order item {} not found", order_item_id))
            })?;

        let thing = existing.id.clone().ok_or_else(|| {
            RepoError::Database("Order item record missing internal id".to_string())
        })?;

        let food_id = data.food_id.unwrap_or(existing.food_id);
        let quantity = data.quantity.unwrap_or(existing.quantity);
        let unit_price = data
            .unit_price
            .map(to_fixed_2)
            .unwrap_or(existing.unit_price);
        let updated_at = Utc::now();

        self.base
            .write(async {
                let mut result = self
                    .base
                    .db()
                    .query(
                        "UPDATE $thing SET food_id = $food_id, quantity = $quantity, \
                         unit_price = $unit_price, updated_at = $updated_at RETURN AFTER",
                    )
                    .bind(("thing", thing))
                    .bind(("food_id", food_id))
                    .bind(("quantity", quantity))
                    .bind(("unit_price", unit_price))
                    .bind(("updated_at", updated_at))
                    .await?;
                let updated: Vec<OrderItem> = result.take(0)?;
                updated.into_iter().next().ok_or_else(|| {
                    RepoError::NotFound(format!("Order item {} not found", order_item_id))
                })
            })
            .await
    }
}
