//! Dining Table Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub table_id: String,
    pub table_number: i64,
    pub number_of_guests: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create dining table payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DiningTableCreate {
    #[validate(range(min = 1))]
    pub table_number: i64,
    #[validate(range(min = 1))]
    pub number_of_guests: i64,
}

/// Field-level dining table patch
#[derive(Debug, Clone, Deserialize)]
pub struct DiningTableUpdate {
    pub table_number: Option<i64>,
    pub number_of_guests: Option<i64>,
}
