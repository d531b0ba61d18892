//! Order Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderUpdate};
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

/// Optional list filters, mapped straight from query params
#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    pub status: Option<String>,
    pub order_type: Option<String>,
    pub table_number: Option<i64>,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create an order under a caller-chosen record key.
    ///
    /// The key is generated before the write so the dine-in transaction can
    /// reference "order:key" in the same statement batch.
    pub async fn create_with_key(&self, key: &str, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self
            .base
            .db()
            .create((TABLE, key))
            .content(order)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find orders, newest first, with optional filters
    pub async fn find_all(&self, filter: OrderFilter) -> RepoResult<Vec<Order>> {
        let mut conditions: Vec<&str> = Vec::new();
        if filter.status.is_some() {
            conditions.push("status = $status");
        }
        if filter.order_type.is_some() {
            conditions.push("order_type = $order_type");
        }
        if filter.table_number.is_some() {
            conditions.push("table_number = $table_number");
        }

        let query_str = if conditions.is_empty() {
            "SELECT * FROM order ORDER BY created_at DESC".to_string()
        } else {
            format!(
                "SELECT * FROM order WHERE {} ORDER BY created_at DESC",
                conditions.join(" AND ")
            )
        };

        let mut query = self.base.db().query(query_str);
        if let Some(v) = filter.status {
            query = query.bind(("status", v));
        }
        if let Some(v) = filter.order_type {
            query = query.bind(("order_type", v));
        }
        if let Some(v) = filter.table_number {
            query = query.bind(("table_number", v));
        }

        let orders: Vec<Order> = query.await?.take(0)?;
        Ok(orders)
    }

    /// Find order by record id ("order:key" or bare key)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing: RecordId = if id.contains(':') {
            id.parse()
                .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?
        } else {
            RecordId::from_table_key(TABLE, id)
        };
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Kitchen display: everything still moving (pending/preparing/ready)
    pub async fn find_live(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE status IN ['pending', 'preparing', 'ready'] \
                 ORDER BY created_at",
            )
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Counter view: non-dine-in orders created since `since_millis`
    pub async fn find_counter_since(&self, since_millis: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE order_type != 'dine-in' AND created_at >= $since \
                 ORDER BY created_at DESC",
            )
            .bind(("since", since_millis))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// All take-away orders, newest first
    pub async fn find_takeaway(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE order_type = 'take-away' ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders created since a timestamp (analytics windows)
    pub async fn find_since(&self, since_millis: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE created_at >= $since ORDER BY created_at")
            .bind(("since", since_millis))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Unpaid orders for one table (settlement input)
    pub async fn find_unpaid_by_table(&self, table_number: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE table_number = $table_number \
                 AND payment_status = 'unpaid' AND status != 'cancelled' \
                 ORDER BY created_at",
            )
            .bind(("table_number", table_number))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Partial update (status / payment fields)
    pub async fn update(&self, id: &str, data: OrderUpdate) -> RepoResult<Order> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;
        let thing = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Order record has no id".to_string()))?;

        let mut set_parts: Vec<&str> = vec!["updated_at = $updated_at"];
        if data.status.is_some() {
            set_parts.push("status = $status");
        }
        if data.payment_status.is_some() {
            set_parts.push("payment_status = $payment_status");
        }
        if data.payment_method.is_some() {
            set_parts.push("payment_method = $payment_method");
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("thing", thing))
            .bind(("updated_at", now_millis()));
        if let Some(v) = data.status {
            query = query.bind(("status", v));
        }
        if let Some(v) = data.payment_status {
            query = query.bind(("payment_status", v));
        }
        if let Some(v) = data.payment_method {
            query = query.bind(("payment_method", v));
        }

        let mut result = query.await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }
}
