//! Analytics API Handlers

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::auth::CurrentAdmin;
use crate::core::ServerState;
use crate::db::models::{Order, OrderType, PaymentStatus};
use crate::db::repository::{MenuItemRepository, OrderRepository};
use crate::pricing::{round_money, to_decimal, to_f64};
use crate::utils::time::range_start_millis;
use crate::utils::AppResult;

/// Query params: range=24h|today|week|month
#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    #[serde(default = "default_range")]
    pub range: String,
}

fn default_range() -> String {
    "today".to_string()
}

/// Top-selling item row
#[derive(Debug, Clone, Serialize)]
pub struct TopItem {
    pub item_id: i64,
    pub name: String,
    pub quantity: i64,
}

/// Overview statistics
#[derive(Debug, Clone, Serialize)]
pub struct OverviewStats {
    pub revenue: f64,
    pub orders: usize,
    pub paid_orders: usize,
    pub average_order_value: f64,
    pub dine_in_orders: usize,
    pub take_away_orders: usize,
    pub delivery_orders: usize,
    pub cancelled_orders: usize,
    pub revenue_by_method: HashMap<String, f64>,
    pub top_items: Vec<TopItem>,
}

/// GET /api/analytics/overview - 经营概览 (管理端)
pub async fn overview(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Query(query): Query<OverviewQuery>,
) -> AppResult<Json<OverviewStats>> {
    let since = range_start_millis(&query.range)?;

    let order_repo = OrderRepository::new(state.db.clone());
    let orders = order_repo.find_since(since).await?;

    Ok(Json(compute_overview(&state, orders).await?))
}

async fn compute_overview(state: &ServerState, orders: Vec<Order>) -> AppResult<OverviewStats> {
    let mut revenue = Decimal::ZERO;
    let mut paid_orders = 0usize;
    let mut dine_in = 0usize;
    let mut take_away = 0usize;
    let mut delivery = 0usize;
    let mut cancelled = 0usize;
    let mut by_method: HashMap<String, Decimal> = HashMap::new();
    let mut quantities: HashMap<i64, i64> = HashMap::new();

    for order in &orders {
        match order.order_type {
            OrderType::DineIn => dine_in += 1,
            OrderType::TakeAway => take_away += 1,
            OrderType::Delivery => delivery += 1,
        }
        if order.status == crate::db::models::OrderStatus::Cancelled {
            cancelled += 1;
            continue;
        }
        if order.payment_status == PaymentStatus::Paid {
            paid_orders += 1;
            let total = to_decimal(order.charges.total);
            revenue += total;
            let method = order
                .payment_method
                .clone()
                .unwrap_or_else(|| "unknown".to_string());
            *by_method.entry(method).or_insert(Decimal::ZERO) += total;
        }
        for line in &order.items {
            *quantities.entry(line.item_id).or_insert(0) += line.quantity as i64;
        }
    }

    // Top 5 items by quantity, names resolved from the menu
    let mut top: Vec<(i64, i64)> = quantities.into_iter().collect();
    top.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    top.truncate(5);

    let menu_repo = MenuItemRepository::new(state.db.clone());
    let ids: Vec<i64> = top.iter().map(|(id, _)| *id).collect();
    let menu = menu_repo.find_by_item_ids(&ids).await?;
    let names: HashMap<i64, String> = menu
        .into_iter()
        .map(|m| (m.item_id, m.name))
        .collect();

    let top_items = top
        .into_iter()
        .map(|(item_id, quantity)| TopItem {
            item_id,
            name: names
                .get(&item_id)
                .cloned()
                .unwrap_or_else(|| format!("#{}", item_id)),
            quantity,
        })
        .collect();

    let average = if paid_orders > 0 {
        revenue / Decimal::from(paid_orders as i64)
    } else {
        Decimal::ZERO
    };

    Ok(OverviewStats {
        revenue: to_f64(round_money(revenue)),
        orders: orders.len(),
        paid_orders,
        average_order_value: to_f64(round_money(average)),
        dine_in_orders: dine_in,
        take_away_orders: take_away,
        delivery_orders: delivery,
        cancelled_orders: cancelled,
        revenue_by_method: by_method
            .into_iter()
            .map(|(k, v)| (k, to_f64(round_money(v))))
            .collect(),
        top_items,
    })
}
