//! Razorpay Checkout API 模块
//!
//! 网关本身是外部协作方：这里只负责本地下单记录和回调签名校验，
//! 不发任何出站请求。

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/razorpay", razorpay_routes())
}

fn razorpay_routes() -> Router<ServerState> {
    Router::new()
        .route("/create-order", post(handler::create_order))
        .route("/verify-payment", post(handler::verify_payment))
}
