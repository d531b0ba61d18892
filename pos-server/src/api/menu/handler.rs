//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentAdmin;
use crate::core::ServerState;
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::db::repository::{CounterRepository, MenuItemRepository, RepoError};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Query params for listing the menu
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// `all=true` includes unavailable items (admin view)
    #[serde(default)]
    pub all: bool,
}

/// GET /api/menu/items - 获取菜单
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let items = repo.find_all(query.all).await?;
    Ok(Json(items))
}

/// GET /api/menu/items/:id - 获取单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(item_id): Path<i64>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo
        .find_by_item_id(item_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuItemNotFound).with_detail("item_id", item_id))?;
    Ok(Json(item))
}

/// POST /api/menu/items - 创建菜品 (管理端)
pub async fn create(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.category, "category", MAX_NAME_LEN)?;

    // item_id 未提供时从计数器取下一个
    let item_id = match payload.item_id {
        Some(id) => id,
        None => {
            let counter = CounterRepository::new(state.db.clone());
            counter.next("menu_item").await?
        }
    };

    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo.create(item_id, payload).await.map_err(|e| match e {
        RepoError::Duplicate(_) => {
            AppError::new(ErrorCode::MenuItemIdExists).with_detail("item_id", item_id)
        }
        other => other.into(),
    })?;

    Ok(Json(item))
}

/// PATCH /api/menu/items/:id - 更新菜品 (管理端)
pub async fn update(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Path(item_id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }

    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo.update(item_id, payload).await.map_err(|e| match e {
        RepoError::NotFound(_) => {
            AppError::new(ErrorCode::MenuItemNotFound).with_detail("item_id", item_id)
        }
        other => other.into(),
    })?;
    Ok(Json(item))
}

/// DELETE /api/menu/items/:id - 删除菜品 (管理端)
pub async fn delete(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Path(item_id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = MenuItemRepository::new(state.db.clone());
    repo.delete(item_id).await.map_err(|e| match e {
        RepoError::NotFound(_) => {
            AppError::new(ErrorCode::MenuItemNotFound).with_detail("item_id", item_id)
        }
        other => other.into(),
    })?;
    Ok(Json(true))
}
