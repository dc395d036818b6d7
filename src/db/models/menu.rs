//! Menu Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Menu entity: a named group of foods, optionally time-bounded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub menu_id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create menu payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MenuCreate {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Field-level menu patch
///
/// `start_date` and `end_date` are only applied when both are provided and
/// the window is ordered.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}
