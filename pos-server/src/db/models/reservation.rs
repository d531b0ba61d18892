//! Reservation Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Reservation status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Seated,
    Completed,
    Cancelled,
    NoShow,
}

impl ReservationStatus {
    /// States that block a table (count for overlap checks)
    pub fn holds_table(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::Seated)
    }

    /// Terminal states release the tables
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }
}

/// Embedded prepayment record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationPayment {
    pub amount: f64,
    pub method: String,
    pub paid_at: i64,
}

/// Reservation entity
///
/// `date`/`time` are kept as the customer entered them for display;
/// `starts_at` (Unix millis, validated at the API boundary) is what every
/// overlap computation uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub customer_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// YYYY-MM-DD, as entered
    pub date: String,
    /// HH:mm, as entered
    pub time: String,
    /// Validated start timestamp (Unix millis, UTC)
    pub starts_at: i64,
    pub duration_minutes: i64,
    pub guests: i32,
    pub table_numbers: Vec<i64>,
    /// Legacy single-table field still present on imported documents
    #[serde(default, rename = "table_number")]
    pub legacy_table_number: Option<i64>,
    pub status: ReservationStatus,
    #[serde(default)]
    pub payment: Option<ReservationPayment>,
    pub created_at: i64,
}

impl Reservation {
    /// End of the reserved window (exclusive)
    pub fn ends_at(&self) -> i64 {
        self.starts_at + self.duration_minutes * 60_000
    }

    /// All tables this reservation holds, merging the legacy single field
    pub fn tables(&self) -> Vec<i64> {
        let mut tables = self.table_numbers.clone();
        if let Some(n) = self.legacy_table_number
            && !tables.contains(&n)
        {
            tables.push(n);
        }
        tables
    }

    /// Whether this reservation touches the given table number
    pub fn holds_table_number(&self, number: i64) -> bool {
        self.table_numbers.contains(&number) || self.legacy_table_number == Some(number)
    }
}

/// Create reservation payload
///
/// Accepts either the `table_numbers` list or the legacy single
/// `table_number` field; the two are merged on input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub customer_name: String,
    pub phone: Option<String>,
    pub date: String,
    pub time: String,
    pub guests: i32,
    #[serde(default)]
    pub table_numbers: Option<Vec<i64>>,
    /// Legacy single-table field
    #[serde(default)]
    pub table_number: Option<i64>,
    pub duration_minutes: Option<i64>,
}

impl ReservationCreate {
    /// Merge `table_numbers` with the legacy single field, deduplicated
    pub fn requested_tables(&self) -> Vec<i64> {
        let mut tables = self.table_numbers.clone().unwrap_or_default();
        if let Some(n) = self.table_number
            && !tables.contains(&n)
        {
            tables.push(n);
        }
        tables
    }
}

/// Partial update payload (PATCH)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReservationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guests: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_numbers: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<ReservationPayment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_tables_merges_legacy_field() {
        let create = ReservationCreate {
            customer_name: "Asha".into(),
            phone: None,
            date: "2026-08-10".into(),
            time: "19:00".into(),
            guests: 4,
            table_numbers: Some(vec![3, 5]),
            table_number: Some(5),
            duration_minutes: None,
        };
        assert_eq!(create.requested_tables(), vec![3, 5]);

        let legacy_only = ReservationCreate {
            table_numbers: None,
            table_number: Some(7),
            ..create
        };
        assert_eq!(legacy_only.requested_tables(), vec![7]);
    }

    #[test]
    fn test_status_holds_table() {
        assert!(ReservationStatus::Pending.holds_table());
        assert!(ReservationStatus::Confirmed.holds_table());
        assert!(ReservationStatus::Seated.holds_table());
        assert!(!ReservationStatus::Cancelled.holds_table());
        assert!(!ReservationStatus::NoShow.holds_table());
        assert!(ReservationStatus::NoShow.is_terminal());
    }
}
