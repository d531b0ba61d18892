//! Dining Table Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Table status enum
///
/// 单一共享可变标志，订单/会话/预订多条流程都会读写；
/// 写入以最后一次为准 (last writer wins)。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TableStatus {
    Available,
    Occupied,
    Cleaning,
    Reserved,
    Maintenance,
    Setup,
}

/// Table activity kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityKind {
    Cleaning,
    Maintenance,
    Setup,
    Inspection,
}

/// Table activity lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityStatus {
    Active,
    Completed,
    Cancelled,
}

/// Append-only activity record on a table.
/// Invariant: at most one *active* cleaning activity per table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableActivity {
    pub activity_id: String,
    pub kind: ActivityKind,
    pub status: ActivityStatus,
    #[serde(default)]
    pub note: Option<String>,
    pub started_at: i64,
    #[serde(default)]
    pub ended_at: Option<i64>,
}

/// Dining table entity (桌台)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Unique table number
    pub number: i64,
    #[serde(default = "default_capacity")]
    pub capacity: i32,
    pub status: TableStatus,
    #[serde(default)]
    pub section: Option<String>,
    /// Active session id, if any
    #[serde(default)]
    pub session_id: Option<String>,
    /// Order record ids ("order:key") accumulated for the current seating
    #[serde(default)]
    pub order_ids: Vec<String>,
    /// All session ids this table has hosted
    #[serde(default)]
    pub session_history: Vec<String>,
    #[serde(default)]
    pub reservation_price: f64,
    #[serde(default)]
    pub activities: Vec<TableActivity>,
}

fn default_capacity() -> i32 {
    4
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub number: i64,
    pub capacity: Option<i32>,
    pub section: Option<String>,
    pub reservation_price: Option<f64>,
}

/// Partial update payload (PATCH)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TableStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_price: Option<f64>,
}

/// Create activity payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityCreate {
    pub kind: ActivityKind,
    pub note: Option<String>,
}

/// Close activity payload (complete or cancel)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityClose {
    pub status: ActivityStatus,
}

/// Availability query result row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailableTable {
    pub number: i64,
    pub capacity: i32,
    pub reservation_price: f64,
}
