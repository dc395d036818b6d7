//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderUpdate};
use crate::db::repository::{DiningTableRepository, OrderRepository};
use crate::utils::{AppError, AppResult};

async fn ensure_table_exists(state: &ServerState, table_id: &str) -> AppResult<()> {
    let repo = DiningTableRepository::new(state.db.clone());
    if repo.find_by_table_id(table_id).await?.is_none() {
        return Err(AppError::not_found(format!("Table {} not found", table_id)));
    }
    Ok(())
}

/// GET /api/orders - all orders
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_all().await?;
    Ok(Json(orders))
}

/// GET /api/orders/:order_id - fetch one order
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_order_id(&order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", order_id)))?;
    Ok(Json(order))
}

/// POST /api/orders - create an order, optionally bound to a table
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    if let Some(table_id) = &payload.table_id {
        ensure_table_exists(&state, table_id).await?;
    }

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.create(payload).await?;
    Ok(Json(order))
}

/// PATCH /api/orders/:order_id - move an order to another table
pub async fn update(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    if let Some(table_id) = &payload.table_id {
        ensure_table_exists(&state, table_id).await?;
    }

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.update(&order_id, payload).await?;
    Ok(Json(order))
}
