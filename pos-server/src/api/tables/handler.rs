//! Dining Table API Handlers
//!
//! 包含桌台 CRUD、活动记录、可用性查询和 SSE 实时流。
//! 每个写操作之后全量广播一次桌台列表。

use std::convert::Infallible;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;

use crate::auth::CurrentAdmin;
use crate::core::ServerState;
use crate::db::models::{
    ActivityClose, ActivityCreate, AvailableTable, DiningTable, DiningTableCreate,
    DiningTableUpdate,
};
use crate::db::repository::{RepoError, TableRepository};
use crate::ordering::{AvailabilityQuery, available_tables};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let repo = TableRepository::new(state.db.clone());
    let tables = repo.find_all().await?;
    Ok(Json(tables))
}

/// GET /api/tables/stream - 桌台列表 SSE 流
///
/// 订阅时先补发一份当前快照，之后每次桌台变更推送一帧全量列表。
/// 无重放缓冲：慢消费者丢帧后由下一帧全量列表追平。
pub async fn stream(
    State(state): State<ServerState>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let rx = state.table_stream.subscribe();

    let repo = TableRepository::new(state.db.clone());
    let tables = repo.find_all().await?;
    let snapshot = serde_json::to_string(&tables).unwrap_or_else(|_| "[]".to_string());

    let initial = stream::once(async move { Ok::<_, Infallible>(Event::default().data(snapshot)) });
    let updates = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(json) => {
                    return Some((Ok::<_, Infallible>(Event::default().data(json)), rx));
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "SSE subscriber lagged; dropping frames");
                    continue;
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(initial.chain(updates)).keep_alive(KeepAlive::default()))
}

/// Query params for the availability endpoint
#[derive(Debug, Deserialize)]
pub struct AvailableQuery {
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration: Option<i64>,
}

/// GET /api/tables/available - 查询时间窗口内可用的桌台
pub async fn available(
    State(state): State<ServerState>,
    Query(query): Query<AvailableQuery>,
) -> AppResult<Json<Vec<AvailableTable>>> {
    let result = available_tables(
        &state,
        AvailabilityQuery {
            date: query.date,
            time: query.time,
            duration: query.duration,
        },
    )
    .await?;
    Ok(Json(result))
}

/// GET /api/tables/:id - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    let repo = TableRepository::new(state.db.clone());
    let table = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TableNotFound).with_detail("id", id.clone()))?;
    Ok(Json(table))
}

/// POST /api/tables - 创建桌台 (管理端)
pub async fn create(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    validate_optional_text(&payload.section, "section", MAX_NOTE_LEN)?;

    let repo = TableRepository::new(state.db.clone());
    let table = repo.create(payload).await.map_err(|e| match e {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::TableNumberExists, msg),
        other => other.into(),
    })?;

    state.broadcast_tables().await;
    Ok(Json(table))
}

/// PATCH /api/tables/:id - 更新桌台 (管理端)
pub async fn update(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    let repo = TableRepository::new(state.db.clone());
    let table = repo.update(&id, payload).await.map_err(|e| match e {
        RepoError::NotFound(_) => {
            AppError::new(ErrorCode::TableNotFound).with_detail("id", id.clone())
        }
        other => other.into(),
    })?;

    state.broadcast_tables().await;
    Ok(Json(table))
}

/// DELETE /api/tables/:id - 删除桌台 (管理端)
pub async fn delete(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = TableRepository::new(state.db.clone());
    let result = repo.delete(&id).await.map_err(|e| match e {
        RepoError::NotFound(_) => {
            AppError::new(ErrorCode::TableNotFound).with_detail("id", id.clone())
        }
        other => other.into(),
    })?;

    state.broadcast_tables().await;
    Ok(Json(result))
}

/// POST /api/tables/:id/activities - 添加桌台活动 (管理端)
///
/// 同一桌台同时最多一条进行中的清洁活动。
pub async fn add_activity(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
    Json(payload): Json<ActivityCreate>,
) -> AppResult<Json<DiningTable>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let repo = TableRepository::new(state.db.clone());
    let table = repo
        .add_activity(&id, payload.kind, payload.note)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => {
                AppError::with_message(ErrorCode::TableCleaningInProgress, msg)
            }
            RepoError::NotFound(_) => {
                AppError::new(ErrorCode::TableNotFound).with_detail("id", id.clone())
            }
            other => other.into(),
        })?;

    state.broadcast_tables().await;
    Ok(Json(table))
}

/// PATCH /api/tables/:id/activities/:activity_id - 结束桌台活动 (管理端)
pub async fn close_activity(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Path((id, activity_id)): Path<(String, String)>,
    Json(payload): Json<ActivityClose>,
) -> AppResult<Json<DiningTable>> {
    let repo = TableRepository::new(state.db.clone());
    let table = repo
        .close_activity(&id, &activity_id, payload.status)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(msg) if msg.contains("Activity") => {
                AppError::new(ErrorCode::ActivityNotFound).with_detail("activity_id", activity_id.clone())
            }
            RepoError::NotFound(_) => {
                AppError::new(ErrorCode::TableNotFound).with_detail("id", id.clone())
            }
            RepoError::Duplicate(msg) => {
                AppError::with_message(ErrorCode::ActivityAlreadyClosed, msg)
            }
            other => other.into(),
        })?;

    state.broadcast_tables().await;
    Ok(Json(table))
}
