//! Food API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Food, FoodCreate, FoodUpdate};
use crate::db::repository::{FoodRepository, MenuRepository};
use crate::utils::{AppError, AppResult, PageParams};

#[derive(Debug, Serialize)]
pub struct FoodPage {
    pub total_count: i64,
    pub food_items: Vec<Food>,
}

/// GET /api/foods - paginated food listing
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<FoodPage>> {
    let repo = FoodRepository::new(state.db.clone());
    let (total_count, food_items) = repo.find_page(&params).await?;

    Ok(Json(FoodPage {
        total_count,
        food_items,
    }))
}

/// GET /api/foods/:food_id - fetch one food
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(food_id): Path<String>,
) -> AppResult<Json<Food>> {
    let repo = FoodRepository::new(state.db.clone());
    let food = repo
        .find_by_food_id(&food_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Food {} not found", food_id)))?;

    Ok(Json(food))
}

/// POST /api/foods - create a food under an existing menu
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FoodCreate>,
) -> AppResult<Json<Food>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let menu_repo = MenuRepository::new(state.db.clone());
    if menu_repo.find_by_menu_id(&payload.menu_id).await?.is_none() {
        return Err(AppError::not_found(format!(
            "Menu {} not found",
            payload.menu_id
        )));
    }

    let repo = FoodRepository::new(state.db.clone());
    let food = repo.create(payload).await?;

    Ok(Json(food))
}

/// PATCH /api/foods/:food_id - partial update
pub async fn update(
    State(state): State<ServerState>,
    Path(food_id): Path<String>,
    Json(payload): Json<FoodUpdate>,
) -> AppResult<Json<Food>> {
    if let Some(menu_id) = &payload.menu_id {
        let menu_repo = MenuRepository::new(state.db.clone());
        if menu_repo.find_by_menu_id(menu_id).await?.is_none() {
            return Err(AppError::not_found(format!("Menu {} not found", menu_id)));
        }
    }

    let repo = FoodRepository::new(state.db.clone());
    let food = repo.update(&food_id, payload).await?;

    Ok(Json(food))
}
