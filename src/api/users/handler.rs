//! User API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{hash_password, verify_password};
use crate::core::ServerState;
use crate::db::models::{UserCreate, UserView};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult, PageParams};

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 2, max = 100))]
    pub first_name: String,
    #[validate(length(min = 2, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 5, max = 30))]
    pub phone: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response for signup, login and refresh
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserView,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct UserPage {
    pub total_count: i64,
    pub user_items: Vec<UserView>,
}

/// POST /api/users/signup - register a new account
pub async fn signup(
    State(state): State<ServerState>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let hashed_password =
        hash_password(&payload.password).map_err(|e| AppError::internal(e.to_string()))?;

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .create(UserCreate {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            phone: payload.phone,
            hashed_password,
            avatar: payload.avatar,
        })
        .await?;

    let pair = state
        .jwt()
        .generate_all_tokens(&user.user_id, &user.email, &user.first_name, &user.last_name)?;
    let user = repo
        .update_tokens(&user.user_id, &pair.token, &pair.refresh_token)
        .await?;

    Ok(Json(AuthResponse {
        user: user.into(),
        token: pair.token,
        refresh_token: pair.refresh_token,
    }))
}

/// POST /api/users/login - exchange credentials for a token pair
///
/// Unknown email and wrong password return the same message, so the
/// endpoint cannot be used to probe which accounts exist.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload
        .validate()
        .map_err(|_| AppError::invalid_credentials())?;

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&payload.password, &user.hashed_password) {
        return Err(AppError::invalid_credentials());
    }

    let pair = state
        .jwt()
        .generate_all_tokens(&user.user_id, &user.email, &user.first_name, &user.last_name)?;
    let user = repo
        .update_tokens(&user.user_id, &pair.token, &pair.refresh_token)
        .await?;

    Ok(Json(AuthResponse {
        user: user.into(),
        token: pair.token,
        refresh_token: pair.refresh_token,
    }))
}

/// POST /api/users/refresh - trade a refresh token for a fresh pair
pub async fn refresh(
    State(state): State<ServerState>,
    Json(payload): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let claims = state.jwt().validate_refresh_token(&payload.refresh_token)?;

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_user_id(&claims.sub)
        .await?
        .ok_or(AppError::InvalidToken)?;

    let pair = state
        .jwt()
        .generate_all_tokens(&user.user_id, &user.email, &user.first_name, &user.last_name)?;
    let user = repo
        .update_tokens(&user.user_id, &pair.token, &pair.refresh_token)
        .await?;

    Ok(Json(AuthResponse {
        user: user.into(),
        token: pair.token,
        refresh_token: pair.refresh_token,
    }))
}

/// GET /api/users - paginated user listing
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<UserPage>> {
    let repo = UserRepository::new(state.db.clone());
    let (total_count, users) = repo.find_page(&params).await?;

    Ok(Json(UserPage {
        total_count,
        user_items: users.into_iter().map(UserView::from).collect(),
    }))
}

/// GET /api/users/:user_id - fetch one user
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserView>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_user_id(&user_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", user_id)))?;

    Ok(Json(user.into()))
}
