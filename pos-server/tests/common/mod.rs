//! 集成测试公共设施：内存数据库 + 种子数据

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

use pos_server::auth::{JwtConfig, JwtService, OtpStore};
use pos_server::core::{Config, ServerState};
use pos_server::db::models::{
    Customer, DiningTable, DiningTableCreate, MenuItem, MenuItemCreate, OrderCreate, OrderLine,
    OrderType,
};
use pos_server::db::repository::{MenuItemRepository, TableRepository};
use pos_server::message::TableStream;

/// Build a ServerState backed by an in-memory database
pub async fn test_state() -> ServerState {
    let db = Surreal::new::<Mem>(()).await.expect("in-memory db");
    db.use_ns("saffron").use_db("pos").await.expect("namespace");

    let config = Config::with_overrides("/tmp/saffron-test", 0);
    let jwt = JwtService::with_config(JwtConfig {
        secret: "integration-test-secret-key-32-chars!".to_string(),
        expiration_minutes: 60,
        issuer: "pos-server".to_string(),
        audience: "pos-dashboard".to_string(),
    });

    ServerState::new(
        config,
        db,
        Arc::new(jwt),
        Arc::new(OtpStore::new()),
        TableStream::new(),
    )
}

/// Seed one menu item
pub async fn seed_menu_item(state: &ServerState, item_id: i64, price: f64) -> MenuItem {
    let repo = MenuItemRepository::new(state.db.clone());
    repo.create(
        item_id,
        MenuItemCreate {
            item_id: Some(item_id),
            name: format!("Item {}", item_id),
            price,
            category: "mains".to_string(),
            is_available: Some(true),
            is_popular: None,
            is_veg: None,
            spice_level: None,
        },
    )
    .await
    .expect("seed menu item")
}

/// Seed one table
pub async fn seed_table(state: &ServerState, number: i64) -> DiningTable {
    let repo = TableRepository::new(state.db.clone());
    repo.create(DiningTableCreate {
        number,
        capacity: Some(4),
        section: None,
        reservation_price: Some(100.0),
    })
    .await
    .expect("seed table")
}

/// Dine-in order payload for one cart
pub fn dine_in_payload(
    table_number: i64,
    items: Vec<(i64, i32)>,
    tax: f64,
    total: f64,
    phone: Option<&str>,
) -> OrderCreate {
    OrderCreate {
        table_number: Some(table_number),
        items: items
            .into_iter()
            .map(|(item_id, quantity)| OrderLine { item_id, quantity })
            .collect(),
        tax,
        discount: 0.0,
        total,
        order_type: OrderType::DineIn,
        payment_method: None,
        customer: phone.map(|p| Customer {
            name: None,
            phone: Some(p.to_string()),
        }),
    }
}

/// Take-away order payload for one cart
pub fn takeaway_payload(items: Vec<(i64, i32)>, tax: f64, total: f64) -> OrderCreate {
    OrderCreate {
        table_number: None,
        items: items
            .into_iter()
            .map(|(item_id, quantity)| OrderLine { item_id, quantity })
            .collect(),
        tax,
        discount: 0.0,
        total,
        order_type: OrderType::TakeAway,
        payment_method: None,
        customer: None,
    }
}
