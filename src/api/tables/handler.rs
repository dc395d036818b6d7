//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use crate::db::repository::DiningTableRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/tables - all dining tables
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let tables = repo.find_all().await?;
    Ok(Json(tables))
}

/// GET /api/tables/:table_id - fetch one table
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo
        .find_by_table_id(&table_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {} not found", table_id)))?;
    Ok(Json(table))
}

/// POST /api/tables - create a table
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo.create(payload).await?;
    Ok(Json(table))
}

/// PATCH /api/tables/:table_id - partial update
pub async fn update(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo.update(&table_id, payload).await?;
    Ok(Json(table))
}
