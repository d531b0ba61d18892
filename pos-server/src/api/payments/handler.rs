//! Payment API Handlers (管理端)

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentAdmin;
use crate::core::ServerState;
use crate::db::models::{Payment, PaymentCreate};
use crate::db::repository::{PaymentRepository, RepoError};
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /api/payments - 支付记录列表
pub async fn list(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
) -> AppResult<Json<Vec<Payment>>> {
    let repo = PaymentRepository::new(state.db.clone());
    let payments = repo.find_all().await?;
    Ok(Json(payments))
}

/// GET /api/payments/table_payments - 按桌结账的支付记录
pub async fn table_payments(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
) -> AppResult<Json<Vec<Payment>>> {
    let repo = PaymentRepository::new(state.db.clone());
    let payments = repo.find_by_table().await?;
    Ok(Json(payments))
}

/// GET /api/payments/:id - 获取单条支付记录
pub async fn get_by_id(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
) -> AppResult<Json<Payment>> {
    let repo = PaymentRepository::new(state.db.clone());
    let payment = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound).with_detail("id", id.clone()))?;
    Ok(Json(payment))
}

/// POST /api/payments - 手工登记支付 (管理端修正路径)
pub async fn create(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Json(payload): Json<PaymentCreate>,
) -> AppResult<Json<Payment>> {
    validate_required_text(&payload.method, "method", MAX_SHORT_TEXT_LEN)?;

    let repo = PaymentRepository::new(state.db.clone());
    let payment = repo.create(payload).await?;
    Ok(Json(payment))
}

/// DELETE /api/payments/:id - 删除支付记录 (管理端修正路径)
pub async fn delete(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = PaymentRepository::new(state.db.clone());
    let result = repo.delete(&id).await.map_err(|e| match e {
        RepoError::NotFound(_) => {
            AppError::new(ErrorCode::PaymentNotFound).with_detail("id", id.clone())
        }
        other => other.into(),
    })?;
    Ok(Json(result))
}
