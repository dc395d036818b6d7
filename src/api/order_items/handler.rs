//! Order Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use validator::Validate;

use crate::billing::{BillingAggregator, BillingSummary};
use crate::core::ServerState;
use crate::db::models::{
    OrderCreate, OrderItem, OrderItemPack, OrderItemUpdate,
};
use crate::db::repository::{
    DiningTableRepository, FoodRepository, OrderItemRepository, OrderRepository,
};
use crate::utils::{AppError, AppResult};

/// Response for a created pack: the new order id plus its items
#[derive(Debug, Serialize)]
pub struct PackResponse {
    pub order_id: String,
    pub order_items: Vec<OrderItem>,
}

/// GET /api/order-items - all order items
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<OrderItem>>> {
    let repo = OrderItemRepository::new(state.db.clone());
    let items = repo.find_all().await?;
    Ok(Json(items))
}

/// GET /api/order-items/:order_item_id - fetch one order item
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(order_item_id): Path<String>,
) -> AppResult<Json<OrderItem>> {
    let repo = OrderItemRepository::new(state.db.clone());
    let item = repo
        .find_by_order_item_id(&order_item_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Order item {} not found", order_item_id))
        })?;
    Ok(Json(item))
}

/// GET /api/order-items/order/:order_id - billing summary for an order
pub async fn items_by_order(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<BillingSummary>> {
    let aggregator = BillingAggregator::new(state.db.clone());
    let summary = aggregator.items_by_order(&order_id).await?;
    Ok(Json(summary))
}

/// POST /api/order-items - create an order with a pack of items
///
/// Creates the order first, then inserts every item under it in one batch.
pub async fn create_pack(
    State(state): State<ServerState>,
    Json(payload): Json<OrderItemPack>,
) -> AppResult<Json<PackResponse>> {
    if payload.order_items.is_empty() {
        return Err(AppError::validation("order_items must not be empty"));
    }
    for item in &payload.order_items {
        item.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
    }

    if let Some(table_id) = &payload.table_id {
        let table_repo = DiningTableRepository::new(state.db.clone());
        if table_repo.find_by_table_id(table_id).await?.is_none() {
            return Err(AppError::not_found(format!("Table {} not found", table_id)));
        }
    }

    let food_repo = FoodRepository::new(state.db.clone());
    for item in &payload.order_items {
        if food_repo.find_by_food_id(&item.food_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Food {} not found",
                item.food_id
            )));
        }
    }

    let order_repo = OrderRepository::new(state.db.clone());
    let order = order_repo
        .create(OrderCreate {
            table_id: payload.table_id,
        })
        .await?;

    let item_repo = OrderItemRepository::new(state.db.clone());
    let order_items = item_repo
        .insert_many(&order.order_id, payload.order_items)
        .await?;

    Ok(Json(PackResponse {
        order_id: order.order_id,
        order_items,
    }))
}

/// PATCH /api/order-items/:order_item_id - partial update
pub async fn update(
    State(state): State<ServerState>,
    Path(order_item_id): Path<String>,
    Json(payload): Json<OrderItemUpdate>,
) -> AppResult<Json<OrderItem>> {
    if let Some(food_id) = &payload.food_id {
        let food_repo = FoodRepository::new(state.db.clone());
        if food_repo.find_by_food_id(food_id).await?.is_none() {
            return Err(AppError::not_found(format!("Food {} not found", food_id)));
        }
    }

    let repo = OrderItemRepository::new(state.db.clone());
    let item = repo.update(&order_item_id, payload).await?;
    Ok(Json(item))
}
