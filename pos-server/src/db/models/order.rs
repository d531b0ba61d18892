//! Order Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order status enum
///
/// 后端状态机只有这五个值。前端 CounterOrder 额外的 `confirmed`/`paid`
/// 不在此定义；付款状态由 [`PaymentStatus`] 单独承载。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Served,
    Cancelled,
}

/// Payment status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

/// Order type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    DineIn,
    TakeAway,
    Delivery,
}

/// One line of the order: menu item reference + quantity.
/// Prices are not embedded; they are resolved from the menu at read time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderLine {
    pub item_id: i64,
    pub quantity: i32,
}

/// Server-computed charge breakdown, stored with the order
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Charges {
    pub subtotal: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub extra_charges: f64,
    pub total: f64,
}

/// Customer contact embedded in orders and sessions
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Customer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Snowflake receipt number
    pub order_no: i64,
    /// Dine-in table; None for take-away/delivery
    pub table_number: Option<i64>,
    /// Owning dine-in session id (S_xxxxxxxx)
    pub session_id: Option<String>,
    pub items: Vec<OrderLine>,
    pub charges: Charges,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub order_type: OrderType,
    #[serde(default)]
    pub customer: Option<Customer>,
    /// Take-away/delivery queue number from the atomic counter
    pub sequence: Option<i64>,
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

/// Create order payload (API)
///
/// `tax`/`discount`/`total` are client-declared amounts; the server recomputes
/// the total from menu prices and rejects on mismatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub table_number: Option<i64>,
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub discount: f64,
    pub total: f64,
    pub order_type: OrderType,
    pub payment_method: Option<String>,
    pub customer: Option<Customer>,
}

/// Partial update payload (PATCH)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}
