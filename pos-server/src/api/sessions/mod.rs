//! Session API 模块

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sessions", session_routes())
}

fn session_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .patch(handler::update)
                .delete(handler::end),
        )
        .route("/{id}/orders", post(handler::add_order))
        .route("/table/{number}", get(handler::get_by_table))
}
