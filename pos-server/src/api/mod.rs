//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`menu`] - 菜单管理接口
//! - [`orders`] - 订单接口
//! - [`tables`] - 桌台接口 (含 SSE 流和可用性查询)
//! - [`reservations`] - 预订接口
//! - [`sessions`] - 堂食会话接口
//! - [`payments`] - 支付记录接口
//! - [`payment_requests`] - 买单请求接口
//! - [`deliveries`] - 外送接口
//! - [`admin`] - 管理员登录 (OTP + JWT)
//! - [`analytics`] - 经营概览
//! - [`razorpay`] - 支付网关 checkout

pub mod admin;
pub mod analytics;
pub mod deliveries;
pub mod health;
pub mod menu;
pub mod orders;
pub mod payment_requests;
pub mod payments;
pub mod razorpay;
pub mod reservations;
pub mod sessions;
pub mod tables;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResult, ApiResponse};

/// Compose the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(menu::router())
        .merge(orders::router())
        .merge(tables::router())
        .merge(reservations::router())
        .merge(sessions::router())
        .merge(payments::router())
        .merge(payment_requests::router())
        .merge(deliveries::router())
        .merge(admin::router())
        .merge(analytics::router())
        .merge(razorpay::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
