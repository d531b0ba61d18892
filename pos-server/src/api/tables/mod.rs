//! Dining Table API 模块

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", table_routes())
}

fn table_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/stream", get(handler::stream))
        .route("/available", get(handler::available))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .patch(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/activities", post(handler::add_activity))
        .route(
            "/{id}/activities/{activity_id}",
            axum::routing::patch(handler::close_activity),
        )
}
