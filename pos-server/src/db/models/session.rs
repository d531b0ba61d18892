//! Dine-in Session Model

use super::order::{Customer, PaymentStatus};
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Running bill for the session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPayment {
    pub total: f64,
    pub status: PaymentStatus,
}

impl Default for SessionPayment {
    fn default() -> Self {
        Self {
            total: 0.0,
            status: PaymentStatus::Unpaid,
        }
    }
}

/// One dine-in seating at a table
///
/// Created when a dine-in order arrives with no active session for the
/// table, or explicitly via the table-assignment flow. Ended by setting
/// `active = false`, which releases the table to `cleaning`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Opaque id, "S_" + 8 hex chars
    pub session_id: String,
    pub table_number: i64,
    /// Order record ids ("order:key") in arrival order
    #[serde(default)]
    pub orders: Vec<String>,
    #[serde(default)]
    pub payment: SessionPayment,
    #[serde(default)]
    pub customer: Option<Customer>,
    pub active: bool,
    pub started_at: i64,
    #[serde(default)]
    pub ended_at: Option<i64>,
}

/// Create session payload (explicit table assignment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreate {
    pub table_number: i64,
    pub customer: Option<Customer>,
}

/// Partial update payload (PATCH)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
}

/// 生成会话 id："S_" + 8 个十六进制字符
pub fn new_session_id() -> String {
    use rand::Rng;
    let n: u32 = rand::thread_rng().r#gen();
    format!("S_{:08x}", n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_shape() {
        let id = new_session_id();
        assert!(id.starts_with("S_"));
        assert_eq!(id.len(), 10);
        assert!(id[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }
}
