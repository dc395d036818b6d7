//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Menu, MenuCreate, MenuUpdate};
use crate::db::repository::MenuRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/menus - all menus
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Menu>>> {
    let repo = MenuRepository::new(state.db.clone());
    let menus = repo.find_all().await?;
    Ok(Json(menus))
}

/// GET /api/menus/:menu_id - fetch one menu
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(menu_id): Path<String>,
) -> AppResult<Json<Menu>> {
    let repo = MenuRepository::new(state.db.clone());
    let menu = repo
        .find_by_menu_id(&menu_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu {} not found", menu_id)))?;
    Ok(Json(menu))
}

/// POST /api/menus - create a menu
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuCreate>,
) -> AppResult<Json<Menu>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    if let (Some(start), Some(end)) = (payload.start_date, payload.end_date)
        && end < start
    {
        return Err(AppError::validation(
            "end_date must not precede start_date",
        ));
    }

    let repo = MenuRepository::new(state.db.clone());
    let menu = repo.create(payload).await?;
    Ok(Json(menu))
}

/// PATCH /api/menus/:menu_id - partial update
pub async fn update(
    State(state): State<ServerState>,
    Path(menu_id): Path<String>,
    Json(payload): Json<MenuUpdate>,
) -> AppResult<Json<Menu>> {
    let repo = MenuRepository::new(state.db.clone());
    let menu = repo.update(&menu_id, payload).await?;
    Ok(Json(menu))
}
