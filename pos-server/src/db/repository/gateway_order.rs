//! Gateway Order Repository
//!
//! 本地存储的网关 checkout 订单记录。网关本身是外部协作方，
//! 这里只保存我们签发的 order id / 金额 / 状态。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::GatewayOrder;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "gateway_order";

#[derive(Clone)]
pub struct GatewayOrderRepository {
    base: BaseRepository,
}

impl GatewayOrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, order: GatewayOrder) -> RepoResult<GatewayOrder> {
        let created: Option<GatewayOrder> =
            self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create gateway order".to_string()))
    }

    pub async fn find_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> RepoResult<Option<GatewayOrder>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM gateway_order WHERE gateway_order_id = $gid LIMIT 1")
            .bind(("gid", gateway_order_id.to_string()))
            .await?;
        let orders: Vec<GatewayOrder> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    pub async fn mark_paid(&self, gateway_order_id: &str) -> RepoResult<GatewayOrder> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE gateway_order SET status = 'paid' \
                 WHERE gateway_order_id = $gid RETURN AFTER",
            )
            .bind(("gid", gateway_order_id.to_string()))
            .await?;
        let orders: Vec<GatewayOrder> = result.take(0)?;
        orders.into_iter().next().ok_or_else(|| {
            RepoError::NotFound(format!("Gateway order {} not found", gateway_order_id))
        })
    }
}
