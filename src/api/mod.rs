//! API Route Modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`users`] - signup, login, token refresh, user management
//! - [`menus`] - menu management
//! - [`foods`] - food catalog
//! - [`tables`] - dining table management
//! - [`orders`] - order management
//! - [`order_items`] - order item management and billing view
//! - [`invoices`] - invoice management
//!
//! Every resource follows the same shape: a `router()` producing
//! `Router<ServerState>` plus a `handler` module with the request handlers.

pub mod foods;
pub mod health;
pub mod invoices;
pub mod menus;
pub mod order_items;
pub mod orders;
pub mod tables;
pub mod users;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(users::router())
        .merge(menus::router())
        .merge(foods::router())
        .merge(tables::router())
        .merge(orders::router())
        .merge(order_items::router())
        .merge(invoices::router())
        // require_auth skips the public routes internally
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
