use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{JwtService, OtpStore};
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::AdminRepository;
use crate::message::TableStream;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是服务端的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，克隆成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | otp_store | Arc<OtpStore> | 管理员登录 OTP 存储 (进程内) |
/// | table_stream | TableStream | 桌台列表 SSE 广播 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
    /// 管理员登录 OTP 存储
    pub otp_store: Arc<OtpStore>,
    /// 桌台列表广播 (单进程 SSE 扇出)
    pub table_stream: TableStream,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`Self::initialize`] 代替
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        otp_store: Arc<OtpStore>,
        table_stream: TableStream,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            otp_store,
            table_stream,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 数据库 (data_dir/database)
    /// 2. 种子管理员 (admin 表为空时按配置写入)
    /// 3. 各服务 (JWT, OTP, TableStream)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        let db_service = DbService::new(&config.database_dir())
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        // Seed the first admin account when the table is empty
        if !config.admin_password.is_empty() {
            let repo = AdminRepository::new(db.clone());
            if let Err(e) = repo
                .ensure_seed(&config.admin_email, &config.admin_password)
                .await
            {
                tracing::warn!("Admin seed failed: {}", e);
            }
        } else if config.is_production() {
            tracing::warn!("ADMIN_PASSWORD not set; no admin account will be seeded");
        }

        Self::new(
            config.clone(),
            db,
            Arc::new(JwtService::with_config(config.jwt.clone())),
            Arc::new(OtpStore::new()),
            TableStream::new(),
        )
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 广播最新桌台列表
    ///
    /// 重新拉取全量桌台列表并推送给所有 SSE 订阅者。
    /// 任何桌台创建/更新/删除/活动变更之后调用。
    /// 拉取失败只记录日志，不影响触发它的请求。
    pub async fn broadcast_tables(&self) {
        use crate::db::repository::TableRepository;

        let repo = TableRepository::new(self.db.clone());
        match repo.find_all().await {
            Ok(tables) => self.table_stream.publish(&tables),
            Err(e) => tracing::warn!("Table broadcast skipped: {}", e),
        }
    }
}
