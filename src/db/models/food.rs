//! Food Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Food entity: a dish belonging to a menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub food_id: String,
    pub name: String,
    /// Price, always rounded to 2 decimal places before persistence
    pub price: Decimal,
    #[serde(default)]
    pub food_image: Option<String>,
    /// Public id of the owning menu
    pub menu_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create food payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FoodCreate {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    pub price: Decimal,
    pub food_image: Option<String>,
    #[validate(length(min = 1))]
    pub menu_id: String,
}

/// Field-level food patch
#[derive(Debug, Clone, Deserialize)]
pub struct FoodUpdate {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub food_image: Option<String>,
    pub menu_id: Option<String>,
}
