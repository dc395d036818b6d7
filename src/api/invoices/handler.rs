//! Invoice API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use validator::Validate;

use crate::billing::{BillingAggregator, BillingItem};
use crate::core::ServerState;
use crate::db::models::{
    Invoice, InvoiceCreate, InvoiceUpdate, PaymentMethod, PaymentStatus,
};
use crate::db::repository::{InvoiceRepository, OrderRepository};
use crate::utils::{AppError, AppResult};

/// Invoice joined with its order's billing summary
#[derive(Debug, Serialize)]
pub struct InvoiceView {
    pub invoice_id: String,
    pub order_id: String,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    pub payment_due: Decimal,
    pub payment_due_date: DateTime<Utc>,
    pub table_number: Option<i64>,
    pub order_items: Vec<BillingItem>,
}

/// GET /api/invoices - all invoices
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Invoice>>> {
    let repo = InvoiceRepository::new(state.db.clone());
    let invoices = repo.find_all().await?;
    Ok(Json(invoices))
}

/// GET /api/invoices/:invoice_id - invoice with its billed items
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(invoice_id): Path<String>,
) -> AppResult<Json<InvoiceView>> {
    let repo = InvoiceRepository::new(state.db.clone());
    let invoice = repo
        .find_by_invoice_id(&invoice_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", invoice_id)))?;

    let aggregator = BillingAggregator::new(state.db.clone());
    let summary = aggregator.items_by_order(&invoice.order_id).await?;

    Ok(Json(InvoiceView {
        invoice_id: invoice.invoice_id,
        order_id: invoice.order_id,
        payment_method: invoice.payment_method,
        payment_status: invoice.payment_status,
        payment_due: summary.payment_due,
        payment_due_date: invoice.payment_due_date,
        table_number: summary.table_number,
        order_items: summary.order_items,
    }))
}

/// POST /api/invoices - create an invoice for an existing order
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<InvoiceCreate>,
) -> AppResult<Json<Invoice>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let order_repo = OrderRepository::new(state.db.clone());
    if order_repo
        .find_by_order_id(&payload.order_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found(format!(
            "Order {} not found",
            payload.order_id
        )));
    }

    let repo = InvoiceRepository::new(state.db.clone());
    let invoice = repo.create(payload).await?;
    Ok(Json(invoice))
}

/// PATCH /api/invoices/:invoice_id - update payment method or status
pub async fn update(
    State(state): State<ServerState>,
    Path(invoice_id): Path<String>,
    Json(payload): Json<InvoiceUpdate>,
) -> AppResult<Json<Invoice>> {
    let repo = InvoiceRepository::new(state.db.clone());
    let invoice = repo.update(&invoice_id, payload).await?;
    Ok(Json(invoice))
}
