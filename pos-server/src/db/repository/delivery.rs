//! Delivery Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Delivery, DeliveryUpdate};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "delivery";

#[derive(Clone)]
pub struct DeliveryRepository {
    base: BaseRepository,
}

impl DeliveryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All deliveries, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Delivery>> {
        let deliveries: Vec<Delivery> = self
            .base
            .db()
            .query("SELECT * FROM delivery ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(deliveries)
    }

    /// Find delivery by record id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Delivery>> {
        let thing: RecordId = if id.contains(':') {
            id.parse()
                .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?
        } else {
            RecordId::from_table_key(TABLE, id)
        };
        let delivery: Option<Delivery> = self.base.db().select(thing).await?;
        Ok(delivery)
    }

    /// Persist a fully-built delivery document
    pub async fn create(&self, delivery: Delivery) -> RepoResult<Delivery> {
        let created: Option<Delivery> = self.base.db().create(TABLE).content(delivery).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create delivery".to_string()))
    }

    /// Partial update (status / eta / slot); transition legality is checked
    /// by the caller against the linked order.
    pub async fn update(&self, id: &str, data: DeliveryUpdate) -> RepoResult<Delivery> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Delivery {} not found", id)))?;
        let thing = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Delivery record has no id".to_string()))?;

        let mut set_parts: Vec<&str> = Vec::new();
        if data.status.is_some() {
            set_parts.push("status = $status");
        }
        if data.eta_millis.is_some() {
            set_parts.push("eta_millis = $eta_millis");
        }
        if data.slot.is_some() {
            set_parts.push("slot = $slot");
        }

        if set_parts.is_empty() {
            return Ok(existing);
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self.base.db().query(query_str).bind(("thing", thing));
        if let Some(v) = data.status {
            query = query.bind(("status", v));
        }
        if let Some(v) = data.eta_millis {
            query = query.bind(("eta_millis", v));
        }
        if let Some(v) = data.slot {
            query = query.bind(("slot", v));
        }

        let mut result = query.await?;
        let deliveries: Vec<Delivery> = result.take(0)?;
        deliveries
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Delivery {} not found", id)))
    }
}
