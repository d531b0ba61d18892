//! Session Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Customer, Session, SessionPayment, new_session_id};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "session";

#[derive(Clone)]
pub struct SessionRepository {
    base: BaseRepository,
}

impl SessionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a fresh active session for a table
    pub async fn create(
        &self,
        table_number: i64,
        customer: Option<Customer>,
    ) -> RepoResult<Session> {
        let session = Session {
            id: None,
            session_id: new_session_id(),
            table_number,
            orders: Vec::new(),
            payment: SessionPayment::default(),
            customer,
            active: true,
            started_at: now_millis(),
            ended_at: None,
        };

        let created: Option<Session> = self.base.db().create(TABLE).content(session).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create session".to_string()))
    }

    /// Find by opaque session id
    pub async fn find_by_session_id(&self, session_id: &str) -> RepoResult<Option<Session>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM session WHERE session_id = $session_id LIMIT 1")
            .bind(("session_id", session_id.to_string()))
            .await?;
        let sessions: Vec<Session> = result.take(0)?;
        Ok(sessions.into_iter().next())
    }

    /// Active session for a table, if any
    pub async fn find_active_by_table(&self, table_number: i64) -> RepoResult<Option<Session>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM session WHERE table_number = $table_number AND active = true \
                 ORDER BY started_at DESC LIMIT 1",
            )
            .bind(("table_number", table_number))
            .await?;
        let sessions: Vec<Session> = result.take(0)?;
        Ok(sessions.into_iter().next())
    }

    /// Update customer contact on an active session
    pub async fn set_customer(
        &self,
        session_id: &str,
        customer: Customer,
    ) -> RepoResult<Session> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE session SET customer = $customer \
                 WHERE session_id = $session_id RETURN AFTER",
            )
            .bind(("session_id", session_id.to_string()))
            .bind(("customer", customer))
            .await?;
        let sessions: Vec<Session> = result.take(0)?;
        sessions
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Session {} not found", session_id)))
    }

    /// Mark the whole session bill paid
    pub async fn mark_paid(&self, session_id: &str) -> RepoResult<Session> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE session SET payment.status = 'paid' \
                 WHERE session_id = $session_id RETURN AFTER",
            )
            .bind(("session_id", session_id.to_string()))
            .await?;
        let sessions: Vec<Session> = result.take(0)?;
        sessions
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Session {} not found", session_id)))
    }

    /// End a session: `active = false` + `ended_at` stamp
    pub async fn end(&self, session_id: &str) -> RepoResult<Session> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE session SET active = false, ended_at = $ended_at \
                 WHERE session_id = $session_id AND active = true RETURN AFTER",
            )
            .bind(("session_id", session_id.to_string()))
            .bind(("ended_at", now_millis()))
            .await?;
        let sessions: Vec<Session> = result.take(0)?;
        sessions
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Active session {} not found", session_id)))
    }
}
