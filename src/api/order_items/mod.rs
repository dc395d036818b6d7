//! Order Item API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/order-items", order_item_routes())
}

fn order_item_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create_pack))
        .route(
            "/{order_item_id}",
            get(handler::get_by_id).patch(handler::update),
        )
        .route("/order/{order_id}", get(handler::items_by_order))
}
