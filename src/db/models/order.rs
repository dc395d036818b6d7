//! Order Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order entity: created on order placement, referenced by every order item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub order_id: String,
    /// Public id of the table the order is seated at
    #[serde(default)]
    pub table_id: Option<String>,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    pub table_id: Option<String>,
}

/// Field-level order patch
#[derive(Debug, Clone, Deserialize)]
pub struct OrderUpdate {
    pub table_id: Option<String>,
}
