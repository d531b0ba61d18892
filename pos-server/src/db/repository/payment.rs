//! Payment Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Payment, PaymentCreate};
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "payment";

#[derive(Clone)]
pub struct PaymentRepository {
    base: BaseRepository,
}

impl PaymentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All payments, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Payment>> {
        let payments: Vec<Payment> = self
            .base
            .db()
            .query("SELECT * FROM payment ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(payments)
    }

    /// Payments tied to a table (dine-in settlements)
    pub async fn find_by_table(&self) -> RepoResult<Vec<Payment>> {
        let payments: Vec<Payment> = self
            .base
            .db()
            .query(
                "SELECT * FROM payment WHERE table_number != NONE ORDER BY created_at DESC",
            )
            .await?
            .take(0)?;
        Ok(payments)
    }

    /// Payments created since a timestamp (analytics windows)
    pub async fn find_since(&self, since_millis: i64) -> RepoResult<Vec<Payment>> {
        let payments: Vec<Payment> = self
            .base
            .db()
            .query("SELECT * FROM payment WHERE created_at >= $since ORDER BY created_at")
            .bind(("since", since_millis))
            .await?
            .take(0)?;
        Ok(payments)
    }

    /// Find payment by record id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Payment>> {
        let thing: RecordId = if id.contains(':') {
            id.parse()
                .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?
        } else {
            RecordId::from_table_key(TABLE, id)
        };
        let payment: Option<Payment> = self.base.db().select(thing).await?;
        Ok(payment)
    }

    /// Record a settled amount (immutable once written)
    pub async fn create(&self, data: PaymentCreate) -> RepoResult<Payment> {
        if data.amount <= 0.0 || !data.amount.is_finite() {
            return Err(RepoError::Validation(format!(
                "amount must be a positive number, got {}",
                data.amount
            )));
        }

        let payment = Payment {
            id: None,
            amount: data.amount,
            method: data.method,
            subject: data.subject,
            table_number: data.table_number,
            created_at: now_millis(),
        };

        let created: Option<Payment> = self.base.db().create(TABLE).content(payment).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create payment".to_string()))
    }

    /// Hard delete (admin correction path)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Payment {} not found", id)))?;
        let thing = existing
            .id
            .ok_or_else(|| RepoError::Database("Payment record has no id".to_string()))?;
        let _: Option<Payment> = self.base.db().delete(thing).await?;
        Ok(true)
    }
}
