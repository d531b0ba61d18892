//! 桌台可用性计算
//!
//! 窗口 `[start, start + duration)`。duration 小于一轮用餐时长 (60 分钟)
//! 时只考虑当前 `available` 的桌台；足够长的提前预订无视当日实时状态，
//! 只排除时间冲突的桌台 — 这是沿用的既定策略，不是疏漏。

use crate::core::ServerState;
use crate::db::models::{AvailableTable, DiningTable, Reservation, TableStatus};
use crate::db::repository::{ReservationRepository, TableRepository};
use crate::utils::time::{MINUTE_MILLIS, intervals_overlap, parse_date_time_millis};
use crate::utils::{AppError, AppResult};
use shared::util::now_millis;

/// 短时窗口阈值 (分钟)：低于它才过滤当前桌台状态
const LIVE_STATUS_THRESHOLD_MINUTES: i64 = 60;

/// Query parameters for the availability endpoint
#[derive(Debug, Clone, Default)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
    pub time: Option<String>,
    /// Minutes; defaults to 60
    pub duration: Option<i64>,
}

/// Compute available tables for the requested window
pub async fn available_tables(
    state: &ServerState,
    query: AvailabilityQuery,
) -> AppResult<Vec<AvailableTable>> {
    let duration = query.duration.unwrap_or(60);
    if !(1..=24 * 60).contains(&duration) {
        return Err(AppError::validation(format!(
            "duration must be between 1 and 1440 minutes, got {}",
            duration
        )));
    }

    let window_start = match (&query.date, &query.time) {
        (Some(date), Some(time)) => parse_date_time_millis(date, time)?,
        (None, None) => now_millis(),
        _ => {
            return Err(AppError::validation(
                "date and time must be provided together",
            ));
        }
    };

    let table_repo = TableRepository::new(state.db.clone());
    let reservation_repo = ReservationRepository::new(state.db.clone());

    let tables = table_repo.find_all().await?;
    let reservations = reservation_repo.find_holding().await?;

    Ok(filter_available(
        &tables,
        &reservations,
        window_start,
        duration,
    ))
}

/// Pure availability filter, shared by the endpoint and the tests.
///
/// `duration < 60` → only currently-available tables are candidates;
/// otherwise every table is a candidate regardless of live status.
/// Any overlapping holding reservation excludes the table.
pub fn filter_available(
    tables: &[DiningTable],
    reservations: &[Reservation],
    window_start: i64,
    duration_minutes: i64,
) -> Vec<AvailableTable> {
    let window_end = window_start + duration_minutes * MINUTE_MILLIS;
    let check_live_status = duration_minutes < LIVE_STATUS_THRESHOLD_MINUTES;

    let mut available: Vec<AvailableTable> = tables
        .iter()
        .filter(|table| !check_live_status || table.status == TableStatus::Available)
        .filter(|table| {
            !reservations.iter().any(|r| {
                r.holds_table_number(table.number)
                    && intervals_overlap(window_start, window_end, r.starts_at, r.ends_at())
            })
        })
        .map(|table| AvailableTable {
            number: table.number,
            capacity: table.capacity,
            reservation_price: table.reservation_price,
        })
        .collect();

    available.sort_by_key(|t| t.number);
    available
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ReservationStatus;

    fn table(number: i64, status: TableStatus) -> DiningTable {
        DiningTable {
            id: None,
            number,
            capacity: 4,
            status,
            section: None,
            session_id: None,
            order_ids: vec![],
            session_history: vec![],
            reservation_price: 100.0,
            activities: vec![],
        }
    }

    fn reservation(tables: Vec<i64>, starts_at: i64, duration_minutes: i64) -> Reservation {
        Reservation {
            id: None,
            customer_name: "Guest".into(),
            phone: None,
            date: "2026-08-10".into(),
            time: "19:00".into(),
            starts_at,
            duration_minutes,
            guests: 2,
            table_numbers: tables,
            legacy_table_number: None,
            status: ReservationStatus::Confirmed,
            payment: None,
            created_at: 0,
        }
    }

    const HOUR: i64 = 60 * MINUTE_MILLIS;

    #[test]
    fn test_short_duration_filters_live_status() {
        let tables = vec![
            table(1, TableStatus::Available),
            table(2, TableStatus::Occupied),
            table(3, TableStatus::Cleaning),
        ];

        let result = filter_available(&tables, &[], 0, 30);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].number, 1);
    }

    #[test]
    fn test_long_duration_ignores_live_status() {
        let tables = vec![
            table(1, TableStatus::Available),
            table(2, TableStatus::Occupied),
            table(3, TableStatus::Maintenance),
        ];

        let result = filter_available(&tables, &[], 0, 60);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_time_conflicts_always_excluded() {
        let tables = vec![
            table(1, TableStatus::Available),
            table(2, TableStatus::Available),
        ];
        // Table 2 reserved for one hour starting half an hour into the window
        let reservations = vec![reservation(vec![2], HOUR / 2, 60)];

        let result = filter_available(&tables, &reservations, 0, 60);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].number, 1);

        // Same with a long-duration query: live status ignored, conflict not
        let result = filter_available(&tables, &reservations, 0, 120);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].number, 1);
    }

    #[test]
    fn test_adjacent_windows_do_not_conflict() {
        let tables = vec![table(1, TableStatus::Available)];
        // Reservation starts exactly when the requested window ends
        let reservations = vec![reservation(vec![1], HOUR, 60)];

        let result = filter_available(&tables, &reservations, 0, 60);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_legacy_single_table_field_counts() {
        let tables = vec![table(5, TableStatus::Available)];
        let mut r = reservation(vec![], HOUR / 2, 60);
        r.legacy_table_number = Some(5);

        let result = filter_available(&tables, &[r], 0, 60);
        assert!(result.is_empty());
    }

    #[test]
    fn test_result_sorted_by_number() {
        let tables = vec![
            table(9, TableStatus::Available),
            table(2, TableStatus::Available),
            table(5, TableStatus::Available),
        ];
        let result = filter_available(&tables, &[], 0, 60);
        let numbers: Vec<i64> = result.iter().map(|t| t.number).collect();
        assert_eq!(numbers, vec![2, 5, 9]);
    }
}
