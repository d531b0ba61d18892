//! Menu API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", menu_routes())
}

fn menu_routes() -> Router<ServerState> {
    Router::new()
        .route("/items", get(handler::list).post(handler::create))
        .route(
            "/items/{id}",
            get(handler::get_by_id)
                // 管理后台的两种保存路径都走同一个部分更新
                .put(handler::update)
                .patch(handler::update)
                .delete(handler::delete),
        )
}
