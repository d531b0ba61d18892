//! Payment / Payment Request Models

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// What a payment settles — exactly one of order / reservation / session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "id")]
pub enum PaymentSubject {
    Order(String),
    Reservation(String),
    Session(String),
}

/// Immutable record of a settled amount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub amount: f64,
    pub method: String,
    pub subject: PaymentSubject,
    #[serde(default)]
    pub table_number: Option<i64>,
    pub created_at: i64,
}

/// Create payment payload (manual entry from the dashboard)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreate {
    pub amount: f64,
    pub method: String,
    pub subject: PaymentSubject,
    pub table_number: Option<i64>,
}

/// Short-lived "bring the bill" marker for a table.
///
/// `amount` is recomputed from the table's unpaid orders on every list;
/// stale requests (nothing unpaid, or past the TTL) are garbage-collected
/// lazily by the list endpoint — there is no background job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub table_number: i64,
    #[serde(default)]
    pub session_id: Option<String>,
    pub amount: f64,
    pub created_at: i64,
}

/// Create payment request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequestCreate {
    pub table_number: i64,
    pub session_id: Option<String>,
}

/// Local record of a gateway checkout order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Public id handed to the checkout widget ("order_<snowflake>")
    pub gateway_order_id: String,
    /// Amount in minor currency units
    pub amount_minor: i64,
    pub currency: String,
    pub receipt: String,
    /// created | paid
    pub status: String,
    pub created_at: i64,
}
