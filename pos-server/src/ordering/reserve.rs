//! 预订创建流程
//!
//! 冲突判定全部用毫秒时间戳区间：请求的 `[starts_at, starts_at+duration)`
//! 与任一 holding 状态预订的窗口重叠、且桌台集合相交 → 409。
//! 对正在用餐的桌台，把活跃会话视作从现在开始占用一轮用餐时长。

use crate::core::ServerState;
use crate::db::models::{Reservation, ReservationCreate, ReservationStatus};
use crate::db::repository::{ReservationRepository, SessionRepository, TableRepository};
use crate::utils::time::{MINUTE_MILLIS, intervals_overlap, parse_date_time_millis};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::util::now_millis;

/// Validate and create a reservation, rejecting overlaps with existing
/// bookings and live dine-in seatings.
pub async fn create_reservation(
    state: &ServerState,
    payload: ReservationCreate,
) -> AppResult<Reservation> {
    validate_required_text(&payload.customer_name, "customer_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    if payload.guests <= 0 {
        return Err(AppError::validation("guests must be positive"));
    }

    let tables = payload.requested_tables();
    if tables.is_empty() {
        return Err(AppError::validation("at least one table is required"));
    }

    let starts_at = parse_date_time_millis(&payload.date, &payload.time)
        .map_err(|e| AppError::with_message(ErrorCode::ReservationBadTime, e.message))?;
    if starts_at < now_millis() {
        return Err(AppError::with_message(
            ErrorCode::ReservationBadTime,
            "reservation time is in the past",
        ));
    }
    let duration_minutes = payload
        .duration_minutes
        .unwrap_or(state.config.session_minutes);
    if !(1..=24 * 60).contains(&duration_minutes) {
        return Err(AppError::validation(format!(
            "duration_minutes must be between 1 and 1440, got {}",
            duration_minutes
        )));
    }

    // 所有请求的桌台必须存在
    let table_repo = TableRepository::new(state.db.clone());
    for number in &tables {
        if table_repo.find_by_number(*number).await?.is_none() {
            return Err(
                AppError::new(ErrorCode::TableNotFound).with_detail("table_number", *number),
            );
        }
    }

    let window_end = starts_at + duration_minutes * MINUTE_MILLIS;

    // 1. 与现有 holding 预订的冲突
    let reservation_repo = ReservationRepository::new(state.db.clone());
    let existing = reservation_repo.find_holding_for_tables(&tables).await?;
    for other in &existing {
        if intervals_overlap(starts_at, window_end, other.starts_at, other.ends_at()) {
            return Err(AppError::new(ErrorCode::ReservationConflict)
                .with_detail("conflicting_tables", conflicting_tables(&tables, other))
                .with_detail("conflicting_time", other.time.clone()));
        }
    }

    // 2. 与正在进行的堂食会话的冲突 (视作占用 [now, now+session_minutes))
    let session_repo = SessionRepository::new(state.db.clone());
    let live_end = now_millis() + state.config.session_minutes * MINUTE_MILLIS;
    for number in &tables {
        if session_repo.find_active_by_table(*number).await?.is_some()
            && intervals_overlap(starts_at, window_end, now_millis(), live_end)
        {
            return Err(AppError::new(ErrorCode::ReservationConflict)
                .with_detail("table_number", *number)
                .with_detail("reason", "table currently seated"));
        }
    }

    let reservation = Reservation {
        id: None,
        customer_name: payload.customer_name,
        phone: payload.phone,
        date: payload.date,
        time: payload.time,
        starts_at,
        duration_minutes,
        guests: payload.guests,
        table_numbers: tables,
        legacy_table_number: None,
        status: ReservationStatus::Pending,
        payment: None,
        created_at: now_millis(),
    };

    Ok(reservation_repo.create(reservation).await?)
}

/// 请求桌台集合与另一预订的交集
fn conflicting_tables(requested: &[i64], other: &Reservation) -> Vec<i64> {
    requested
        .iter()
        .copied()
        .filter(|n| other.holds_table_number(*n))
        .collect()
}
