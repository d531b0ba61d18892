//! Order API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/live", get(handler::live))
        .route("/counter", get(handler::counter))
        .route("/takeaway", get(handler::takeaway))
        .route("/{id}", get(handler::get_by_id).patch(handler::update))
}
