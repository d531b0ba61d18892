//! Payment Request Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{PaymentRequest, PaymentRequestCreate};
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "payment_request";

#[derive(Clone)]
pub struct PaymentRequestRepository {
    base: BaseRepository,
}

impl PaymentRequestRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All open requests, oldest first
    pub async fn find_all(&self) -> RepoResult<Vec<PaymentRequest>> {
        let requests: Vec<PaymentRequest> = self
            .base
            .db()
            .query("SELECT * FROM payment_request ORDER BY created_at")
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// Find request by record id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<PaymentRequest>> {
        let thing: RecordId = if id.contains(':') {
            id.parse()
                .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?
        } else {
            RecordId::from_table_key(TABLE, id)
        };
        let request: Option<PaymentRequest> = self.base.db().select(thing).await?;
        Ok(request)
    }

    /// Create a request for a table; a previous request for the same table
    /// is replaced rather than duplicated.
    pub async fn create(
        &self,
        data: PaymentRequestCreate,
        amount: f64,
    ) -> RepoResult<PaymentRequest> {
        self.base
            .db()
            .query("DELETE payment_request WHERE table_number = $table_number")
            .bind(("table_number", data.table_number))
            .await?;

        let request = PaymentRequest {
            id: None,
            table_number: data.table_number,
            session_id: data.session_id,
            amount,
            created_at: now_millis(),
        };

        let created: Option<PaymentRequest> =
            self.base.db().create(TABLE).content(request).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create payment request".to_string()))
    }

    /// Refresh the cached amount on a request
    pub async fn set_amount(&self, id: &RecordId, amount: f64) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET amount = $amount")
            .bind(("thing", id.clone()))
            .bind(("amount", amount))
            .await?;
        Ok(())
    }

    /// Hard delete by record id
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Payment request {} not found", id)))?;
        let thing = existing
            .id
            .ok_or_else(|| RepoError::Database("Payment request record has no id".to_string()))?;
        let _: Option<PaymentRequest> = self.base.db().delete(thing).await?;
        Ok(true)
    }
}
