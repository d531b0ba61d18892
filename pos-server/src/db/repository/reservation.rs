//! Reservation Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Reservation, ReservationUpdate};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "reservation";

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All reservations, soonest first
    pub async fn find_all(&self) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query("SELECT * FROM reservation ORDER BY starts_at")
            .await?
            .take(0)?;
        Ok(reservations)
    }

    /// Find reservation by record id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Reservation>> {
        let thing: RecordId = if id.contains(':') {
            id.parse()
                .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?
        } else {
            RecordId::from_table_key(TABLE, id)
        };
        let reservation: Option<Reservation> = self.base.db().select(thing).await?;
        Ok(reservation)
    }

    /// Reservations in table-holding states ({pending, confirmed, seated})
    /// whose table set intersects `tables`. Window filtering happens in the
    /// caller — the lists are small.
    pub async fn find_holding_for_tables(&self, tables: &[i64]) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query(
                "SELECT * FROM reservation \
                 WHERE status IN ['pending', 'confirmed', 'seated'] \
                 AND (table_numbers CONTAINSANY $tables OR table_number IN $tables) \
                 ORDER BY starts_at",
            )
            .bind(("tables", tables.to_vec()))
            .await?
            .take(0)?;
        Ok(reservations)
    }

    /// All table-holding reservations (availability sweep)
    pub async fn find_holding(&self) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query(
                "SELECT * FROM reservation \
                 WHERE status IN ['pending', 'confirmed', 'seated'] \
                 ORDER BY starts_at",
            )
            .await?
            .take(0)?;
        Ok(reservations)
    }

    /// Persist a fully-validated reservation
    pub async fn create(&self, reservation: Reservation) -> RepoResult<Reservation> {
        let created: Option<Reservation> = self
            .base
            .db()
            .create(TABLE)
            .content(reservation)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create reservation".to_string()))
    }

    /// Partial update by record id
    pub async fn update(&self, id: &str, data: ReservationUpdate) -> RepoResult<Reservation> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))?;
        let thing = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Reservation record has no id".to_string()))?;

        let mut set_parts: Vec<&str> = Vec::new();
        if data.status.is_some() {
            set_parts.push("status = $status");
        }
        if data.guests.is_some() {
            set_parts.push("guests = $guests");
        }
        if data.table_numbers.is_some() {
            set_parts.push("table_numbers = $table_numbers");
        }
        if data.payment.is_some() {
            set_parts.push("payment = $payment");
        }

        if set_parts.is_empty() {
            return Ok(existing);
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self.base.db().query(query_str).bind(("thing", thing));
        if let Some(v) = data.status {
            query = query.bind(("status", v));
        }
        if let Some(v) = data.guests {
            query = query.bind(("guests", v));
        }
        if let Some(v) = data.table_numbers {
            query = query.bind(("table_numbers", v));
        }
        if let Some(v) = data.payment {
            query = query.bind(("payment", v));
        }

        let mut result = query.await?;
        let reservations: Vec<Reservation> = result.take(0)?;
        reservations
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))
    }

    /// Hard delete by record id
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))?;
        let thing = existing
            .id
            .ok_or_else(|| RepoError::Database("Reservation record has no id".to_string()))?;
        let _: Option<Reservation> = self.base.db().delete(thing).await?;
        Ok(true)
    }
}
