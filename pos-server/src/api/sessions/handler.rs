//! Session API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Session, SessionCreate, SessionUpdate};
use crate::db::repository::{OrderRepository, SessionRepository, TableRepository};
use crate::ordering::end_session;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// POST /api/sessions - 显式开台 (桌台分配流程)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SessionCreate>,
) -> AppResult<Json<Session>> {
    if let Some(customer) = &payload.customer {
        validate_optional_text(&customer.name, "customer name", MAX_NAME_LEN)?;
        validate_optional_text(&customer.phone, "customer phone", MAX_SHORT_TEXT_LEN)?;
    }

    let table_repo = TableRepository::new(state.db.clone());
    table_repo
        .find_by_number(payload.table_number)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::TableNotFound)
                .with_detail("table_number", payload.table_number)
        })?;

    let session_repo = SessionRepository::new(state.db.clone());
    if session_repo
        .find_active_by_table(payload.table_number)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::TableOccupied)
            .with_detail("table_number", payload.table_number));
    }

    let session = session_repo
        .create(payload.table_number, payload.customer)
        .await?;

    // 占台 + 记录会话历史
    state
        .db
        .query(
            "UPDATE dining_table SET status = 'occupied', session_id = $session_id, \
             session_history = array::union(session_history, [$session_id]) \
             WHERE number = $number",
        )
        .bind(("session_id", session.session_id.clone()))
        .bind(("number", payload.table_number))
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    state.broadcast_tables().await;
    Ok(Json(session))
}

/// GET /api/sessions/:id - 获取会话
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Session>> {
    let repo = SessionRepository::new(state.db.clone());
    let session = repo
        .find_by_session_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::SessionNotFound).with_detail("session_id", id.clone()))?;
    Ok(Json(session))
}

/// GET /api/sessions/table/:number - 获取某桌的活跃会话
pub async fn get_by_table(
    State(state): State<ServerState>,
    Path(number): Path<i64>,
) -> AppResult<Json<Session>> {
    let repo = SessionRepository::new(state.db.clone());
    let session = repo
        .find_active_by_table(number)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::SessionNotFound).with_detail("table_number", number))?;
    Ok(Json(session))
}

/// PATCH /api/sessions/:id - 更新会话 (顾客信息 / 付款状态)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SessionUpdate>,
) -> AppResult<Json<Session>> {
    let repo = SessionRepository::new(state.db.clone());

    let mut session = repo
        .find_by_session_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::SessionNotFound).with_detail("session_id", id.clone()))?;

    if let Some(customer) = payload.customer {
        validate_optional_text(&customer.name, "customer name", MAX_NAME_LEN)?;
        validate_optional_text(&customer.phone, "customer phone", MAX_SHORT_TEXT_LEN)?;
        session = repo.set_customer(&id, customer).await?;
    }
    if let Some(status) = payload.payment_status
        && status == crate::db::models::PaymentStatus::Paid
    {
        session = repo.mark_paid(&id).await?;
    }

    Ok(Json(session))
}

/// Payload for attaching an existing order to a session
#[derive(Debug, Deserialize)]
pub struct AddOrderPayload {
    pub order_id: String,
}

/// POST /api/sessions/:id/orders - 把已有订单挂到会话
pub async fn add_order(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AddOrderPayload>,
) -> AppResult<Json<Session>> {
    let session_repo = SessionRepository::new(state.db.clone());
    let session = session_repo
        .find_by_session_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::SessionNotFound).with_detail("session_id", id.clone()))?;
    if !session.active {
        return Err(AppError::new(ErrorCode::SessionEnded).with_detail("session_id", id.clone()));
    }

    let order_repo = OrderRepository::new(state.db.clone());
    let order = order_repo
        .find_by_id(&payload.order_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", payload.order_id.clone())
        })?;
    let order_ref = order
        .id
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_else(|| payload.order_id.clone());

    if session.orders.contains(&order_ref) {
        return Ok(Json(session));
    }

    state
        .db
        .query(
            "UPDATE session SET orders += $order_ref, payment.total += $amount \
             WHERE session_id = $session_id",
        )
        .bind(("order_ref", order_ref))
        .bind(("amount", order.charges.total))
        .bind(("session_id", id.clone()))
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let session = session_repo
        .find_by_session_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::SessionNotFound).with_detail("session_id", id.clone()))?;
    Ok(Json(session))
}

/// DELETE /api/sessions/:id - 结束会话 (桌台转 cleaning)
pub async fn end(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    end_session(&state, &id).await?;
    Ok(Json(true))
}
