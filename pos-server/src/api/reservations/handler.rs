//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Reservation, ReservationCreate, ReservationStatus, ReservationUpdate, TableStatus};
use crate::db::repository::{
    RepoError, ReservationRepository, SessionRepository, TableRepository,
};
use crate::ordering::create_reservation;
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /api/reservations - 获取预订列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Reservation>>> {
    let repo = ReservationRepository::new(state.db.clone());
    let reservations = repo.find_all().await?;
    Ok(Json(reservations))
}

/// GET /api/reservations/:id - 获取单个预订
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let repo = ReservationRepository::new(state.db.clone());
    let reservation = repo.find_by_id(&id).await?.ok_or_else(|| {
        AppError::new(ErrorCode::ReservationNotFound).with_detail("id", id.clone())
    })?;
    Ok(Json(reservation))
}

/// POST /api/reservations - 创建预订
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<Reservation>> {
    let created = create_reservation(&state, payload).await?;
    Ok(Json(created))
}

/// PATCH /api/reservations/:id - 更新预订
///
/// 状态流转的桌台副作用：`confirmed` → reserved、`seated` → occupied、
/// 终态 → 释放回 available (没有活跃会话时)。尽力而为，失败记日志。
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<Reservation>> {
    let repo = ReservationRepository::new(state.db.clone());
    let previous = repo.find_by_id(&id).await?.ok_or_else(|| {
        AppError::new(ErrorCode::ReservationNotFound).with_detail("id", id.clone())
    })?;

    if let Some(next) = payload.status
        && previous.status.is_terminal()
        && next != previous.status
    {
        return Err(AppError::new(ErrorCode::ReservationStatusInvalid)
            .with_detail("current", format!("{:?}", previous.status)));
    }

    let reservation = repo.update(&id, payload).await.map_err(|e| match e {
        RepoError::NotFound(_) => {
            AppError::new(ErrorCode::ReservationNotFound).with_detail("id", id.clone())
        }
        other => other.into(),
    })?;

    apply_table_side_effects(&state, &previous, &reservation).await;
    state.broadcast_tables().await;

    Ok(Json(reservation))
}

/// DELETE /api/reservations/:id - 删除预订
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ReservationRepository::new(state.db.clone());
    let result = repo.delete(&id).await.map_err(|e| match e {
        RepoError::NotFound(_) => {
            AppError::new(ErrorCode::ReservationNotFound).with_detail("id", id.clone())
        }
        other => other.into(),
    })?;
    Ok(Json(result))
}

/// 状态变更的桌台副作用
async fn apply_table_side_effects(
    state: &ServerState,
    previous: &Reservation,
    current: &Reservation,
) {
    if previous.status == current.status {
        return;
    }

    let table_repo = TableRepository::new(state.db.clone());
    let session_repo = SessionRepository::new(state.db.clone());

    for number in current.tables() {
        let result = match current.status {
            ReservationStatus::Seated => {
                table_repo
                    .set_status_by_number(number, TableStatus::Occupied)
                    .await
            }
            ReservationStatus::Confirmed => {
                table_repo
                    .set_status_by_number(number, TableStatus::Reserved)
                    .await
            }
            status if status.is_terminal() => {
                // 有活跃会话的桌台不动 (另一拨客人在用)
                match session_repo.find_active_by_table(number).await {
                    Ok(None) => {
                        table_repo
                            .set_status_by_number(number, TableStatus::Available)
                            .await
                    }
                    Ok(Some(_)) => continue,
                    Err(e) => Err(e),
                }
            }
            _ => continue,
        };

        if let Err(e) = result {
            tracing::warn!(
                table = number,
                "Failed to sync table status after reservation change: {}",
                e
            );
        }
    }
}
