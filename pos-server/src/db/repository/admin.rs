//! Admin Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::auth::hash_password;
use crate::db::models::Admin;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "admin";

#[derive(Clone)]
pub struct AdminRepository {
    base: BaseRepository,
}

impl AdminRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find admin by email (login lookup)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Admin>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM admin WHERE email = $email LIMIT 1")
            .bind(("email", email.to_lowercase()))
            .await?;
        let admins: Vec<Admin> = result.take(0)?;
        Ok(admins.into_iter().next())
    }

    /// Seed the first admin account if the table is empty.
    ///
    /// Called once at startup; a non-empty table is left untouched so
    /// password rotation happens through the dashboard, not the env.
    pub async fn ensure_seed(&self, email: &str, password: &str) -> RepoResult<()> {
        let existing: Vec<Admin> = self
            .base
            .db()
            .query("SELECT * FROM admin LIMIT 1")
            .await?
            .take(0)?;
        if !existing.is_empty() {
            return Ok(());
        }

        let password_hash = hash_password(password)
            .map_err(|e| RepoError::Validation(format!("Failed to hash password: {e}")))?;

        let admin = Admin {
            id: None,
            email: email.to_lowercase(),
            password_hash,
            name: "Administrator".to_string(),
            role: "admin".to_string(),
            is_active: true,
            created_at: now_millis(),
        };

        let created: Option<Admin> = self.base.db().create(TABLE).content(admin).await?;
        if created.is_none() {
            return Err(RepoError::Database("Failed to seed admin".to_string()));
        }
        tracing::info!("Seeded initial admin account {}", email);
        Ok(())
    }
}
