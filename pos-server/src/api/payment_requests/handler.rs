//! Payment Request API Handlers
//!
//! 桌边"请送账单"流程。列表接口顺带做懒回收；确认接口一次性结清
//! 该桌所有未付订单。

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::auth::CurrentAdmin;
use crate::core::ServerState;
use crate::db::models::{Payment, PaymentRequest, PaymentRequestCreate};
use crate::db::repository::{PaymentRequestRepository, RepoError};
use crate::ordering::{confirm_request, create_request, refresh_requests};
use crate::utils::{AppError, AppResult, ErrorCode};

/// POST /api/payment-requests - 创建买单请求 (桌边)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PaymentRequestCreate>,
) -> AppResult<Json<PaymentRequest>> {
    let request = create_request(&state, payload).await?;
    Ok(Json(request))
}

/// GET /api/payment-requests - 列出买单请求 (管理端，懒回收)
pub async fn list(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
) -> AppResult<Json<Vec<PaymentRequest>>> {
    let requests = refresh_requests(&state).await?;
    Ok(Json(requests))
}

/// Settlement response body
#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub payment: Payment,
    pub orders_settled: usize,
}

/// POST /api/payment-requests/:id/confirm - 确认结账 (管理端)
pub async fn confirm(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
) -> AppResult<Json<ConfirmResponse>> {
    let result = confirm_request(&state, &id).await?;
    Ok(Json(ConfirmResponse {
        payment: result.payment,
        orders_settled: result.orders_settled,
    }))
}

/// DELETE /api/payment-requests/:id - 撤回买单请求
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = PaymentRequestRepository::new(state.db.clone());
    let result = repo.delete(&id).await.map_err(|e| match e {
        RepoError::NotFound(_) => {
            AppError::new(ErrorCode::PaymentRequestNotFound).with_detail("id", id.clone())
        }
        other => other.into(),
    })?;
    Ok(Json(result))
}
