//! Invoice API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/invoices", invoice_routes())
}

fn invoice_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{invoice_id}",
            get(handler::get_by_id).patch(handler::update),
        )
}
