//! User API module
//!
//! Signup, login and token refresh are public; the rest requires a valid
//! session token.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", user_routes())
}

fn user_routes() -> Router<ServerState> {
    Router::new()
        .route("/signup", post(handler::signup))
        .route("/login", post(handler::login))
        .route("/refresh", post(handler::refresh))
        .route("/", get(handler::list))
        .route("/{user_id}", get(handler::get_by_id))
}
