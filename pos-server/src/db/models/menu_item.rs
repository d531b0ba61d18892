//! Menu Item Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Menu item entity (菜品)
///
/// `item_id` is the stable numeric key used by order payloads;
/// `price` is the single source of truth for all total computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Stable numeric key, unique across the menu
    pub item_id: i64,
    pub name: String,
    pub price: f64,
    pub category: String,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_available: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_popular: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_veg: bool,
    /// 0 = none, 1..=3 mild/medium/hot
    #[serde(default)]
    pub spice_level: i32,
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    /// Omitted → next value from the atomic counter
    pub item_id: Option<i64>,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub is_available: Option<bool>,
    pub is_popular: Option<bool>,
    pub is_veg: Option<bool>,
    pub spice_level: Option<i32>,
}

/// Partial update payload (PATCH)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_popular: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_veg: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<i32>,
}
