use crate::auth::JwtConfig;

/// 服务器配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATA_DIR | /var/lib/saffron/pos | 数据目录 (数据库、日志) |
/// | HTTP_PORT | 4000 | HTTP 服务端口 |
/// | SESSION_MINUTES | 60 | 堂食一轮用餐时长 (分钟) |
/// | PAYMENT_REQUEST_TTL_MINUTES | 60 | 买单请求有效期 (分钟) |
/// | ADMIN_EMAIL | admin@example.com | 首次启动种子管理员邮箱 |
/// | ADMIN_PASSWORD | (必须设置) | 首次启动种子管理员密码 |
/// | GATEWAY_KEY_ID | (空) | 支付网关 key id |
/// | GATEWAY_KEY_SECRET | (空) | 支付网关 key secret |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// DATA_DIR=/data/saffron HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 数据目录，存储数据库、日志等文件
    pub data_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,

    // === 业务配置 ===
    /// 堂食一轮用餐时长 (分钟)，预订冲突窗口和可用性查询共用
    pub session_minutes: i64,
    /// 买单请求有效期 (分钟)
    pub payment_request_ttl_minutes: i64,

    // === 种子管理员 ===
    pub admin_email: String,
    pub admin_password: String,

    // === 支付网关 ===
    pub gateway_key_id: String,
    pub gateway_key_secret: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR")
                .unwrap_or_else(|_| "/var/lib/saffron/pos".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            session_minutes: std::env::var("SESSION_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60),
            payment_request_ttl_minutes: std::env::var("PAYMENT_REQUEST_TTL_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60),

            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@example.com".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or_default(),

            gateway_key_id: std::env::var("GATEWAY_KEY_ID").unwrap_or_default(),
            gateway_key_secret: std::env::var("GATEWAY_KEY_SECRET").unwrap_or_default(),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(data_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.data_dir = data_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库存储目录
    pub fn database_dir(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join("database")
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
