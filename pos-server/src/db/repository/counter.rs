//! Atomic Counter Repository
//!
//! 命名序列号。单条 UPSERT 语句对同一记录是原子的，
//! 取代原实现 count-then-insert 的竞态写法。

use super::{BaseRepository, RepoError, RepoResult};
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Debug, Deserialize)]
struct CounterDoc {
    value: i64,
}

#[derive(Clone)]
pub struct CounterRepository {
    base: BaseRepository,
}

impl CounterRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Increment the named sequence and return the new value (starts at 1)
    pub async fn next(&self, name: &str) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("UPSERT type::thing('counter', $name) SET value += 1 RETURN AFTER")
            .bind(("name", name.to_string()))
            .await?;
        let docs: Vec<CounterDoc> = result.take(0)?;
        docs.into_iter()
            .next()
            .map(|d| d.value)
            .ok_or_else(|| RepoError::Database(format!("Counter {} returned no value", name)))
    }
}
