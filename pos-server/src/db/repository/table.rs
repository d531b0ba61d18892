//! Dining Table Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{
    ActivityKind, ActivityStatus, DiningTable, DiningTableCreate, DiningTableUpdate,
    TableActivity, TableStatus,
};
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct TableRepository {
    base: BaseRepository,
}

impl TableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All tables ordered by number
    pub async fn find_all(&self) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table ORDER BY number")
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find table by record id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DiningTable>> {
        let thing: RecordId = if id.contains(':') {
            id.parse()
                .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?
        } else {
            RecordId::from_table_key(TABLE, id)
        };
        let table: Option<DiningTable> = self.base.db().select(thing).await?;
        Ok(table)
    }

    /// Find table by its unique number
    pub async fn find_by_number(&self, number: i64) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE number = $number LIMIT 1")
            .bind(("number", number))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Create a new table
    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        if self.find_by_number(data.number).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Table {} already exists",
                data.number
            )));
        }

        let table = DiningTable {
            id: None,
            number: data.number,
            capacity: data.capacity.unwrap_or(4),
            status: TableStatus::Available,
            section: data.section,
            session_id: None,
            order_ids: Vec::new(),
            session_history: Vec::new(),
            reservation_price: data.reservation_price.unwrap_or(0.0),
            activities: Vec::new(),
        };

        let created: Option<DiningTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    /// Partial update by record id
    pub async fn update(&self, id: &str, data: DiningTableUpdate) -> RepoResult<DiningTable> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;
        let thing = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Table record has no id".to_string()))?;

        let mut set_parts: Vec<&str> = Vec::new();
        if data.capacity.is_some() {
            set_parts.push("capacity = $capacity");
        }
        if data.status.is_some() {
            set_parts.push("status = $status");
        }
        if data.section.is_some() {
            set_parts.push("section = $section");
        }
        if data.session_id.is_some() {
            set_parts.push("session_id = $session_id");
        }
        if data.reservation_price.is_some() {
            set_parts.push("reservation_price = $reservation_price");
        }

        if set_parts.is_empty() {
            return Ok(existing);
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self.base.db().query(query_str).bind(("thing", thing));
        if let Some(v) = data.capacity {
            query = query.bind(("capacity", v));
        }
        if let Some(v) = data.status {
            query = query.bind(("status", v));
        }
        if let Some(v) = data.section {
            query = query.bind(("section", v));
        }
        if let Some(v) = data.session_id {
            query = query.bind(("session_id", v));
        }
        if let Some(v) = data.reservation_price {
            query = query.bind(("reservation_price", v));
        }

        let mut result = query.await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        tables
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))
    }

    /// Set status by table number (used by flows keyed on number)
    pub async fn set_status_by_number(
        &self,
        number: i64,
        status: TableStatus,
    ) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query("UPDATE dining_table SET status = $status WHERE number = $number RETURN AFTER")
            .bind(("number", number))
            .bind(("status", status))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Release a table after its seating ends: cleaning status, session
    /// pointer and per-seating order list cleared.
    pub async fn release_to_cleaning(&self, number: i64) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE dining_table SET status = 'cleaning', session_id = NONE, \
                 order_ids = [] WHERE number = $number RETURN AFTER",
            )
            .bind(("number", number))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Hard delete by record id
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;
        let thing = existing
            .id
            .ok_or_else(|| RepoError::Database("Table record has no id".to_string()))?;
        let _: Option<DiningTable> = self.base.db().delete(thing).await?;
        Ok(true)
    }

    /// Append an activity record.
    ///
    /// Rejects a second *active* cleaning — at most one at a time per table.
    pub async fn add_activity(
        &self,
        id: &str,
        kind: ActivityKind,
        note: Option<String>,
    ) -> RepoResult<DiningTable> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;

        if kind == ActivityKind::Cleaning
            && existing.activities.iter().any(|a| {
                a.kind == ActivityKind::Cleaning && a.status == ActivityStatus::Active
            })
        {
            return Err(RepoError::Duplicate(
                "Table already has an active cleaning activity".to_string(),
            ));
        }

        let thing = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Table record has no id".to_string()))?;

        let activity = TableActivity {
            activity_id: uuid::Uuid::new_v4().simple().to_string(),
            kind,
            status: ActivityStatus::Active,
            note,
            started_at: now_millis(),
            ended_at: None,
        };

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET activities += $activity RETURN AFTER")
            .bind(("thing", thing))
            .bind(("activity", activity))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        tables
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))
    }

    /// Close an activity (complete or cancel). The list is append-only;
    /// closing only flips the status and stamps `ended_at`.
    pub async fn close_activity(
        &self,
        id: &str,
        activity_id: &str,
        status: ActivityStatus,
    ) -> RepoResult<DiningTable> {
        if status == ActivityStatus::Active {
            return Err(RepoError::Validation(
                "Activity can only be closed as completed or cancelled".to_string(),
            ));
        }

        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;

        let activity = existing
            .activities
            .iter()
            .find(|a| a.activity_id == activity_id)
            .ok_or_else(|| RepoError::NotFound(format!("Activity {} not found", activity_id)))?;
        if activity.status != ActivityStatus::Active {
            return Err(RepoError::Duplicate(format!(
                "Activity {} is already closed",
                activity_id
            )));
        }

        let thing = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Table record has no id".to_string()))?;

        // Rewrite the whole activities list; the array is small and the
        // document update is atomic.
        let activities: Vec<TableActivity> = existing
            .activities
            .iter()
            .map(|a| {
                if a.activity_id == activity_id {
                    TableActivity {
                        status,
                        ended_at: Some(now_millis()),
                        ..a.clone()
                    }
                } else {
                    a.clone()
                }
            })
            .collect();

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET activities = $activities RETURN AFTER")
            .bind(("thing", thing))
            .bind(("activities", activities))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        tables
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))
    }
}
