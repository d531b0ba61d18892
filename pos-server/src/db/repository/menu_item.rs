//! Menu Item Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find menu items; by default only available ones
    pub async fn find_all(&self, include_unavailable: bool) -> RepoResult<Vec<MenuItem>> {
        let query = if include_unavailable {
            "SELECT * FROM menu_item ORDER BY item_id"
        } else {
            "SELECT * FROM menu_item WHERE is_available = true ORDER BY item_id"
        };
        let items: Vec<MenuItem> = self.base.db().query(query).await?.take(0)?;
        Ok(items)
    }

    /// Find one item by its numeric key
    pub async fn find_by_item_id(&self, item_id: i64) -> RepoResult<Option<MenuItem>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE item_id = $item_id LIMIT 1")
            .bind(("item_id", item_id))
            .await?;
        let items: Vec<MenuItem> = result.take(0)?;
        Ok(items.into_iter().next())
    }

    /// Fetch all items referenced by an order payload in one query
    pub async fn find_by_item_ids(&self, item_ids: &[i64]) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE item_id IN $ids")
            .bind(("ids", item_ids.to_vec()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Create a new menu item; `item_id` must already be resolved by the caller
    pub async fn create(&self, item_id: i64, data: MenuItemCreate) -> RepoResult<MenuItem> {
        if data.price < 0.0 || !data.price.is_finite() {
            return Err(RepoError::Validation(format!(
                "price must be a non-negative number, got {}",
                data.price
            )));
        }
        if self.find_by_item_id(item_id).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Menu item {} already exists",
                item_id
            )));
        }

        let item = MenuItem {
            id: None,
            item_id,
            name: data.name,
            price: data.price,
            category: data.category,
            is_available: data.is_available.unwrap_or(true),
            is_popular: data.is_popular.unwrap_or(false),
            is_veg: data.is_veg.unwrap_or(false),
            spice_level: data.spice_level.unwrap_or(0),
            created_at: now_millis(),
        };

        let created: Option<MenuItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Partial update by numeric key
    pub async fn update(&self, item_id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        if let Some(price) = data.price
            && (price < 0.0 || !price.is_finite())
        {
            return Err(RepoError::Validation(format!(
                "price must be a non-negative number, got {}",
                price
            )));
        }

        // Build dynamic SET clauses with proper type bindings
        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.category.is_some() {
            set_parts.push("category = $category");
        }
        if data.is_available.is_some() {
            set_parts.push("is_available = $is_available");
        }
        if data.is_popular.is_some() {
            set_parts.push("is_popular = $is_popular");
        }
        if data.is_veg.is_some() {
            set_parts.push("is_veg = $is_veg");
        }
        if data.spice_level.is_some() {
            set_parts.push("spice_level = $spice_level");
        }

        if set_parts.is_empty() {
            return self
                .find_by_item_id(item_id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", item_id)));
        }

        let query_str = format!(
            "UPDATE menu_item SET {} WHERE item_id = $item_id RETURN AFTER",
            set_parts.join(", ")
        );

        let mut query = self.base.db().query(query_str).bind(("item_id", item_id));
        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.category {
            query = query.bind(("category", v));
        }
        if let Some(v) = data.is_available {
            query = query.bind(("is_available", v));
        }
        if let Some(v) = data.is_popular {
            query = query.bind(("is_popular", v));
        }
        if let Some(v) = data.is_veg {
            query = query.bind(("is_veg", v));
        }
        if let Some(v) = data.spice_level {
            query = query.bind(("spice_level", v));
        }

        let mut result = query.await?;
        let items: Vec<MenuItem> = result.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", item_id)))
    }

    /// Hard delete by numeric key
    pub async fn delete(&self, item_id: i64) -> RepoResult<()> {
        let mut result = self
            .base
            .db()
            .query("DELETE menu_item WHERE item_id = $item_id RETURN BEFORE")
            .bind(("item_id", item_id))
            .await?;
        let deleted: Vec<MenuItem> = result.take(0)?;
        if deleted.is_empty() {
            return Err(RepoError::NotFound(format!(
                "Menu item {} not found",
                item_id
            )));
        }
        Ok(())
    }
}
