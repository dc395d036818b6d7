//! Order Item Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Order item entity: one line of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub order_item_id: String,
    /// Public id of the owning order; must resolve at creation time
    pub order_id: String,
    pub food_id: String,
    pub quantity: i64,
    /// Unit price, always rounded to 2 decimal places before persistence
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of an order-item pack
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderItemCreate {
    #[validate(length(min = 1))]
    pub food_id: String,
    #[validate(range(min = 1))]
    pub quantity: i64,
    pub unit_price: Decimal,
}

/// Order-item pack: places an order for a table and its items in one call
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemPack {
    pub table_id: Option<String>,
    pub order_items: Vec<OrderItemCreate>,
}

/// Field-level order item patch
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemUpdate {
    pub food_id: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price: Option<Decimal>,
}
