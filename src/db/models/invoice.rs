//! Invoice Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Payment method, empty until the bill is settled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
}

/// Payment status of an invoice
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

/// Invoice entity: the bill raised against an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub invoice_id: String,
    /// Public id of the billed order; must resolve at creation time
    pub order_id: String,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    pub payment_due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create invoice payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InvoiceCreate {
    #[validate(length(min = 1))]
    pub order_id: String,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
}

/// Field-level invoice patch
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceUpdate {
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
}
