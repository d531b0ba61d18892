//! 时间工具函数
//!
//! 所有日期/时间字符串在 API handler 层验证并转换为 `i64` Unix millis，
//! repository 和流程层只接收毫秒时间戳。业务时间一律按 UTC 处理。

use chrono::{Duration, NaiveDate, NaiveTime, Utc};

use super::{AppError, AppResult};

/// 一分钟的毫秒数
pub const MINUTE_MILLIS: i64 = 60_000;

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析时间字符串 (HH:mm)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time format: {}", time)))
}

/// 日期 + 时间 → Unix millis (UTC)
pub fn date_time_millis(date: NaiveDate, time: NaiveTime) -> i64 {
    date.and_time(time).and_utc().timestamp_millis()
}

/// 解析并合并日期/时间字符串 → Unix millis (UTC)
///
/// 取代原实现的字符串拼接 `"{date}T{time}"`：两段分别校验后再合并。
pub fn parse_date_time_millis(date: &str, time: &str) -> AppResult<i64> {
    Ok(date_time_millis(parse_date(date)?, parse_time(time)?))
}

/// 今天零点 (UTC) 的 Unix millis
pub fn today_start_millis() -> i64 {
    let now = Utc::now();
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|t| t.and_utc().timestamp_millis())
        .unwrap_or_else(|| now.timestamp_millis())
}

/// 分析窗口起点：24h | today | week | month
pub fn range_start_millis(range: &str) -> AppResult<i64> {
    let now = Utc::now();
    let start = match range {
        "24h" => now - Duration::hours(24),
        "today" => return Ok(today_start_millis()),
        "week" => now - Duration::days(7),
        "month" => now - Duration::days(30),
        other => {
            return Err(
                AppError::validation(format!("Invalid range: {}", other))
                    .with_detail("allowed", vec!["24h", "today", "week", "month"]),
            );
        }
    };
    Ok(start.timestamp_millis())
}

/// 区间重叠判定：`[a_start, a_end)` 与 `[b_start, b_end)`
///
/// 预订冲突和桌台可用性共用的唯一判定函数。
pub fn intervals_overlap(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> bool {
    a_start < b_end && a_end > b_start
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_time() {
        let millis = parse_date_time_millis("2026-08-10", "19:30").unwrap();
        // 2026-08-10T19:30:00Z
        assert_eq!(millis, 1786390200000);

        assert!(parse_date_time_millis("10/08/2026", "19:30").is_err());
        assert!(parse_date_time_millis("2026-08-10", "7:30pm").is_err());
        assert!(parse_date_time_millis("2026-13-40", "19:30").is_err());
    }

    #[test]
    fn test_intervals_overlap() {
        // Partial overlap
        assert!(intervals_overlap(0, 100, 50, 150));
        assert!(intervals_overlap(50, 150, 0, 100));
        // Containment
        assert!(intervals_overlap(0, 100, 25, 75));
        // Touching endpoints do not overlap (half-open)
        assert!(!intervals_overlap(0, 100, 100, 200));
        assert!(!intervals_overlap(100, 200, 0, 100));
        // Disjoint
        assert!(!intervals_overlap(0, 100, 200, 300));
    }

    #[test]
    fn test_range_start_rejects_unknown() {
        assert!(range_start_millis("year").is_err());
        assert!(range_start_millis("24h").is_ok());
        assert!(range_start_millis("today").is_ok());
        assert!(range_start_millis("week").is_ok());
        assert!(range_start_millis("month").is_ok());
    }
}
