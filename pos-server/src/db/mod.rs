//! Database Module
//!
//! 嵌入式 SurrealDB 文档存储。每个实体一张表，跨实体引用保存业务键
//! (桌号、菜品编号、会话 id 字符串)，不依赖数据库层的外键约束。

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "saffron";
const DATABASE: &str = "pos";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database under `db_dir`
    pub async fn new(db_dir: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(db_dir)
            .map_err(|e| AppError::database(format!("Failed to create database dir: {e}")))?;

        let db_path = db_dir.join("saffron.db");
        let db = Surreal::new::<RocksDb>(db_path.to_string_lossy().as_ref())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!("Database ready at {}", db_path.display());

        Ok(Self { db })
    }
}
