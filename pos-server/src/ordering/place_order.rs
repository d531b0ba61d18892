//! 订单创建流程
//!
//! 堂食订单要先解析桌台与会话，再把「订单 + 会话 + 桌台」三个文档的
//! 写入放进同一个数据库事务 — 要么全部落盘，要么全部不落。
//! 外带/外送订单跳过桌台解析，从原子计数器取排队号。

use surrealdb::RecordId;

use crate::core::ServerState;
use crate::db::models::{
    Customer, Order, OrderCreate, OrderLine, OrderStatus, OrderType, PaymentStatus, Session,
};
use crate::db::repository::{
    CounterRepository, MenuItemRepository, OrderRepository, ReservationRepository,
    SessionRepository, TableRepository,
};
use crate::pricing::{self, ChargeInput};
use crate::utils::time::{MINUTE_MILLIS, intervals_overlap};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::util::{now_millis, snowflake_id};

const ORDER_TABLE: &str = "order";

/// Result of a successful order placement
#[derive(Debug, Clone, serde::Serialize)]
pub struct PlacedOrder {
    pub order: Order,
    /// The dine-in session the order landed in (created or reused)
    pub session: Option<Session>,
}

/// Create an order: price it server-side, resolve table/session for dine-in,
/// and persist everything atomically.
pub async fn place_order(state: &ServerState, payload: OrderCreate) -> AppResult<PlacedOrder> {
    if let Some(customer) = &payload.customer {
        validate_optional_text(&customer.name, "customer name", MAX_NAME_LEN)?;
        validate_optional_text(&customer.phone, "customer phone", MAX_SHORT_TEXT_LEN)?;
    }
    validate_optional_text(&payload.payment_method, "payment method", MAX_SHORT_TEXT_LEN)?;

    // 1. Server-side repricing against the menu
    let menu_repo = MenuItemRepository::new(state.db.clone());
    let item_ids: Vec<i64> = payload.items.iter().map(|l| l.item_id).collect();
    let menu = menu_repo.find_by_item_ids(&item_ids).await?;

    let charges = pricing::price_order(
        &payload.items,
        &menu,
        &ChargeInput {
            tax: payload.tax,
            discount: payload.discount,
            extras: vec![],
        },
    )?;
    pricing::check_declared_total(&charges, payload.total)?;

    match payload.order_type {
        OrderType::DineIn => place_dine_in(state, payload, charges).await,
        OrderType::TakeAway | OrderType::Delivery => {
            place_counter_order(state, payload, charges).await
        }
    }
}

/// 堂食：解析桌台/会话 → 预订窗口检查 → 单事务落盘
async fn place_dine_in(
    state: &ServerState,
    payload: OrderCreate,
    charges: crate::db::models::Charges,
) -> AppResult<PlacedOrder> {
    let table_number = payload
        .table_number
        .ok_or_else(|| AppError::validation("table_number is required for dine-in orders"))?;

    let table_repo = TableRepository::new(state.db.clone());
    let table = table_repo
        .find_by_number(table_number)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::TableNotFound).with_detail("table_number", table_number)
        })?;

    // Cleaning in progress blocks seating
    if table.activities.iter().any(|a| {
        a.kind == crate::db::models::ActivityKind::Cleaning
            && a.status == crate::db::models::ActivityStatus::Active
    }) {
        return Err(
            AppError::new(ErrorCode::TableCleaningInProgress)
                .with_detail("table_number", table_number),
        );
    }

    let resolution = resolve_session(state, table_number, payload.customer.clone()).await?;
    let session = resolution.session();

    // 2. Build the order document with a pre-chosen record key so the
    //    transaction can reference it before the CREATE lands.
    let key = uuid::Uuid::new_v4().simple().to_string();
    let order_ref = format!("{}:{}", ORDER_TABLE, key);
    let order = Order {
        id: None,
        order_no: snowflake_id(),
        table_number: Some(table_number),
        session_id: Some(session.session_id.clone()),
        items: payload.items.clone(),
        charges: charges.clone(),
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Unpaid,
        payment_method: payload.payment_method.clone(),
        order_type: OrderType::DineIn,
        customer: payload.customer.clone(),
        sequence: None,
        created_at: now_millis(),
        updated_at: None,
    };

    // 3. (新会话 +) 订单 + 会话累计 + 桌台，全部在一个事务里
    // id 由 type::thing 指定，CONTENT 里不能再带 id 字段
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

    let create_session_stmt = if resolution.is_new() {
        "CREATE session CONTENT $session; "
    } else {
        ""
    };
    let query_str = format!(
        "BEGIN TRANSACTION; \
         {create_session_stmt}\
         CREATE type::thing($order_table, $key) CONTENT $order; \
         UPDATE session SET orders += $order_ref, payment.total += $amount \
             WHERE session_id = $session_id; \
         UPDATE dining_table SET status = 'occupied', session_id = $session_id, \
             order_ids += $order_ref, \
             session_history = array::union(session_history, [$session_id]) \
             WHERE number = $table_number; \
         COMMIT TRANSACTION;"
    );

    let mut query = state
        .db
        .query(query_str)
        .bind(("order_table", ORDER_TABLE))
        .bind(("key", key.clone()))
        .bind(("order", order_content))
        .bind(("order_ref", order_ref))
        .bind(("amount", charges.total))
        .bind(("session_id", session.session_id.clone()))
        .bind(("table_number", table_number));
    if resolution.is_new() {
        let session_content = strip_id(
            serde_json::to_value(session)
                .map_err(|e| AppError::internal(format!("Session serialization failed: {e}")))?,
        );
        query = query.bind(("session", session_content));
    }

    query
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .check()
        .map_err(|e| AppError::database(format!("Dine-in transaction failed: {e}")))?;

    let session = resolution.into_session();

    let session_repo = SessionRepository::new(state.db.clone());
    let session = session_repo
        .find_by_session_id(&session.session_id)
        .await?
        .unwrap_or(session);

    let order = Order {
        id: Some(RecordId::from_table_key(ORDER_TABLE, key)),
        ..order
    };

    state.broadcast_tables().await;

    Ok(PlacedOrder {
        order,
        session: Some(session),
    })
}

/// Session resolution outcome: reuse an existing seating or open a new one.
/// A new session document is only materialized inside the dine-in
/// transaction, so a failed placement leaves nothing behind.
enum SessionResolution {
    Existing(Session),
    New(Session),
}

impl SessionResolution {
    fn session(&self) -> &Session {
        match self {
            Self::Existing(s) | Self::New(s) => s,
        }
    }

    fn is_new(&self) -> bool {
        matches!(self, Self::New(_))
    }

    fn into_session(self) -> Session {
        match self {
            Self::Existing(s) | Self::New(s) => s,
        }
    }
}

/// 解析或新建会话。
///
/// 已有活跃会话：来电手机号与会话存储手机号冲突 → 409；
/// 没有会话：先查预订窗口，再在内存里准备新会话 (落盘由事务完成)。
async fn resolve_session(
    state: &ServerState,
    table_number: i64,
    customer: Option<Customer>,
) -> AppResult<SessionResolution> {
    let session_repo = SessionRepository::new(state.db.clone());

    if let Some(session) = session_repo.find_active_by_table(table_number).await? {
        let payload_phone = customer.as_ref().and_then(|c| c.phone.as_deref());
        let session_phone = session.customer.as_ref().and_then(|c| c.phone.as_deref());

        match (payload_phone, session_phone) {
            (Some(incoming), Some(stored)) if incoming != stored => {
                return Err(AppError::with_message(
                    ErrorCode::TableOccupied,
                    "table occupied by another customer",
                )
                .with_detail("table_number", table_number));
            }
            (Some(_), None) => {
                // First order carried no contact; adopt it now
                if let Some(c) = customer {
                    let updated = session_repo.set_customer(&session.session_id, c).await?;
                    return Ok(SessionResolution::Existing(updated));
                }
            }
            _ => {}
        }
        return Ok(SessionResolution::Existing(session));
    }

    // No active session: reject if a reservation starts inside the window
    check_reservation_window(state, table_number).await?;

    Ok(SessionResolution::New(Session {
        id: None,
        session_id: crate::db::models::new_session_id(),
        table_number,
        orders: Vec::new(),
        payment: crate::db::models::SessionPayment::default(),
        customer,
        active: true,
        started_at: now_millis(),
        ended_at: None,
    }))
}

/// 预订窗口检查：`[now, now + session_minutes)` 内有 holding 状态的预订
/// 落在本桌 → 拒绝开台。
async fn check_reservation_window(state: &ServerState, table_number: i64) -> AppResult<()> {
    let reservation_repo = ReservationRepository::new(state.db.clone());
    let reservations = reservation_repo
        .find_holding_for_tables(&[table_number])
        .await?;

    let window_start = now_millis();
    let window_end = window_start + state.config.session_minutes * MINUTE_MILLIS;

    for reservation in &reservations {
        if intervals_overlap(
            window_start,
            window_end,
            reservation.starts_at,
            reservation.ends_at(),
        ) {
            return Err(AppError::with_message(
                ErrorCode::TableReservedSoon,
                "table is reserved within the seating window",
            )
            .with_detail("table_number", table_number)
            .with_detail("reservation_time", reservation.time.clone()));
        }
    }
    Ok(())
}

/// 外带/外送：取排队号后直接落单，无桌台/会话
async fn place_counter_order(
    state: &ServerState,
    payload: OrderCreate,
    charges: crate::db::models::Charges,
) -> AppResult<PlacedOrder> {
    let counter_repo = CounterRepository::new(state.db.clone());
    let counter_name = match payload.order_type {
        OrderType::TakeAway => "takeaway",
        OrderType::Delivery => "delivery",
        OrderType::DineIn => unreachable!("dine-in goes through place_dine_in"),
    };
    let sequence = counter_repo.next(counter_name).await?;

    let key = uuid::Uuid::new_v4().simple().to_string();
    let order = Order {
        id: None,
        order_no: snowflake_id(),
        table_number: None,
        session_id: None,
        items: payload.items.clone(),
        charges,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Unpaid,
        payment_method: payload.payment_method.clone(),
        order_type: payload.order_type,
        customer: payload.customer.clone(),
        sequence: Some(sequence),
        created_at: now_millis(),
        updated_at: None,
    };

    let order_repo = OrderRepository::new(state.db.clone());
    let order = order_repo.create_with_key(&key, order).await?;

    Ok(PlacedOrder {
        order,
        session: None,
    })
}

/// Build an order document for a delivery cart (used by the deliveries API,
/// which prices with delivery fee and tip as extra charges).
pub fn build_delivery_order(
    items: Vec<OrderLine>,
    charges: crate::db::models::Charges,
    customer: Option<Customer>,
    sequence: i64,
) -> Order {
    Order {
        id: None,
        order_no: snowflake_id(),
        table_number: None,
        session_id: None,
        items,
        charges,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Unpaid,
        payment_method: None,
        order_type: OrderType::Delivery,
        customer,
        sequence: Some(sequence),
        created_at: now_millis(),
        updated_at: None,
    }
}
