//! Delivery API Handlers
//!
//! 创建外送 = 同一请求里建订单和外送单，两个文档放一个事务。
//! 状态流转只许前进；`out-for-delivery`/`delivered` 要求关联订单已 `served`。

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use surrealdb::RecordId;

use crate::core::ServerState;
use crate::db::models::{
    Delivery, DeliveryCreate, DeliveryStatus, DeliveryUpdate, Order, TransitionDenied,
    validate_transition,
};
use crate::db::repository::{
    CounterRepository, DeliveryRepository, MenuItemRepository, OrderRepository, RepoError,
};
use crate::ordering::place_order::build_delivery_order;
use crate::pricing::{self, ChargeInput, ExtraCharge};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::util::now_millis;

/// Response for delivery creation: the pair of documents
#[derive(Debug, Serialize)]
pub struct DeliveryCreated {
    pub order: Order,
    pub delivery: Delivery,
}

/// GET /api/deliveries - 外送列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Delivery>>> {
    let repo = DeliveryRepository::new(state.db.clone());
    let deliveries = repo.find_all().await?;
    Ok(Json(deliveries))
}

/// GET /api/deliveries/:id - 获取单个外送单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Delivery>> {
    let repo = DeliveryRepository::new(state.db.clone());
    let delivery = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::DeliveryNotFound).with_detail("id", id.clone()))?;
    Ok(Json(delivery))
}

/// POST /api/deliveries - 创建外送订单
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DeliveryCreate>,
) -> AppResult<Json<DeliveryCreated>> {
    validate_required_text(&payload.address.line1, "address line1", MAX_ADDRESS_LEN)?;
    validate_required_text(&payload.address.city, "city", MAX_NAME_LEN)?;
    validate_required_text(&payload.address.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.address.line2, "address line2", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.slot, "slot", MAX_NOTE_LEN)?;

    // 统一定价：配送费和小费走 extra charges
    let menu_repo = MenuItemRepository::new(state.db.clone());
    let item_ids: Vec<i64> = payload.items.iter().map(|l| l.item_id).collect();
    let menu = menu_repo.find_by_item_ids(&item_ids).await?;

    let charges = pricing::price_order(
        &payload.items,
        &menu,
        &ChargeInput {
            tax: payload.tax,
            discount: payload.discount,
            extras: vec![
                ExtraCharge {
                    name: "delivery_fee",
                    amount: payload.delivery_fee,
                },
                ExtraCharge {
                    name: "tip",
                    amount: payload.tip,
                },
            ],
        },
    )?;
    pricing::check_declared_total(&charges, payload.total)?;

    let counter = CounterRepository::new(state.db.clone());
    let sequence = counter.next("delivery").await?;

    let order_key = uuid::Uuid::new_v4().simple().to_string();
    let delivery_key = uuid::Uuid::new_v4().simple().to_string();
    let order_ref = format!("order:{}", order_key);

    let order = build_delivery_order(
        payload.items.clone(),
        charges,
        payload.customer.clone(),
        sequence,
    );
    let delivery = Delivery {
        id: None,
        order_id: order_ref,
        address: payload.address,
        slot: payload.slot,
        eta_millis: None,
        status: DeliveryStatus::Pending,
        delivery_fee: payload.delivery_fee,
        tip: payload.tip,
        created_at: now_millis(),
    };

    // 订单 + 外送单一个事务；id 由 type::thing 指定，CONTENT 不带 id
    let strip_id = |value: serde_json::Value| {
        let mut value = value;
        if let Some(obj) = value.as_object_mut() {
            obj.remove("id");
        }
        value
    };
    let order_content = strip_id(
        serde_json::to_value(&order)
            .map_err(|e| AppError::internal(format!("Order serialization failed: {e}")))?,
    );
    let delivery_content = strip_id(
        serde_json::to_value(&delivery)
            .map_err(|e| AppError::internal(format!("Delivery serialization failed: {e}")))?,
    );

    state
        .db
        .query(
            "BEGIN TRANSACTION; \
             CREATE type::thing('order', $order_key) CONTENT $order; \
             CREATE type::thing('delivery', $delivery_key) CONTENT $delivery; \
             COMMIT TRANSACTION;",
        )
        .bind(("order_key", order_key.clone()))
        .bind(("order", order_content))
        .bind(("delivery_key", delivery_key.clone()))
        .bind(("delivery", delivery_content))
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .check()
        .map_err(|e| AppError::database(format!("Delivery transaction failed: {e}")))?;

    Ok(Json(DeliveryCreated {
        order: Order {
            id: Some(RecordId::from_table_key("order", order_key)),
            ..order
        },
        delivery: Delivery {
            id: Some(RecordId::from_table_key("delivery", delivery_key)),
            ..delivery
        },
    }))
}

/// PATCH /api/deliveries/:id - 更新外送单
///
/// `out-for-delivery`/`delivered` 只有关联订单处于 `served` 时才允许。
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DeliveryUpdate>,
) -> AppResult<Json<Delivery>> {
    let repo = DeliveryRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::DeliveryNotFound).with_detail("id", id.clone()))?;

    if let Some(next) = payload.status {
        let order_repo = OrderRepository::new(state.db.clone());
        let order = order_repo
            .find_by_id(&existing.order_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::OrderNotFound)
                    .with_detail("order_id", existing.order_id.clone())
            })?;

        validate_transition(existing.status, next, order.status).map_err(|denied| {
            match denied {
                TransitionDenied::Illegal => AppError::new(ErrorCode::DeliveryStatusInvalid)
                    .with_detail(
                        "from",
                        serde_json::to_value(existing.status).unwrap_or_default(),
                    )
                    .with_detail("to", serde_json::to_value(next).unwrap_or_default()),
                TransitionDenied::OrderNotServed => {
                    AppError::new(ErrorCode::DeliveryOrderNotServed)
                        .with_detail("order_id", existing.order_id.clone())
                }
            }
        })?;
    }

    let delivery = repo.update(&id, payload).await.map_err(|e| match e {
        RepoError::NotFound(_) => {
            AppError::new(ErrorCode::DeliveryNotFound).with_detail("id", id.clone())
        }
        other => other.into(),
    })?;
    Ok(Json(delivery))
}
