//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderUpdate};
use crate::db::repository::{OrderFilter, OrderRepository, RepoError};
use crate::ordering::{PlacedOrder, place_order};
use crate::utils::time::today_start_millis;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub order_type: Option<String>,
    pub table: Option<i64>,
}

/// GET /api/orders - 获取订单列表 (可选过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo
        .find_all(OrderFilter {
            status: query.status,
            order_type: query.order_type,
            table_number: query.table,
        })
        .await?;
    Ok(Json(orders))
}

/// POST /api/orders - 下单
///
/// 金额在服务端按菜单价重算；堂食订单会解析/创建会话并在一个事务里
/// 同步订单、会话和桌台。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<PlacedOrder>> {
    let placed = place_order(&state, payload).await?;
    Ok(Json(placed))
}

/// GET /api/orders/live - 厨房显示 (进行中的订单)
pub async fn live(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_live().await?;
    Ok(Json(orders))
}

/// GET /api/orders/counter - 柜台视图 (今日非堂食订单)
pub async fn counter(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_counter_since(today_start_millis()).await?;
    Ok(Json(orders))
}

/// GET /api/orders/takeaway - 外带订单
pub async fn takeaway(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_takeaway().await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 获取单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("id", id.clone()))?;
    Ok(Json(order))
}

/// PATCH /api/orders/:id - 更新订单 (状态/付款字段)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo.update(&id, payload).await.map_err(|e| match e {
        RepoError::NotFound(_) => {
            AppError::new(ErrorCode::OrderNotFound).with_detail("id", id.clone())
        }
        other => other.into(),
    })?;
    Ok(Json(order))
}
