//! Saffron POS Server - 餐厅点单与收银平台后端
//!
//! # 架构概述
//!
//! 本模块是 POS 后端的主入口，提供以下核心功能：
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 文档存储
//! - **定价** (`pricing`): 服务端统一重算订单金额
//! - **下单流程** (`ordering`): 堂食开台、桌台可用性、结账
//! - **认证** (`auth`): 邮箱 OTP 两步登录 + JWT
//! - **实时推送** (`message`): 桌台列表 SSE 广播
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、OTP
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (models + repository)
//! ├── pricing/       # 统一定价
//! ├── ordering/      # 下单/可用性/结账流程
//! ├── message/       # 桌台广播
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod message;
pub mod ordering;
pub mod pricing;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentAdmin, JwtService, OtpStore};
pub use core::{Config, Server, ServerState};
pub use message::TableStream;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use shared::error::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____        __  __
  / ___/____ _ / _|/ _|_____ ___  ____
  \__ \/ __ `/| |_| |_| ___/ _ \|  _ \
 ___/ / /_/ / |  _|  _| | | (_) | | | |
/____/\__,_/  |_| |_| |_|  \___/|_| |_|
              P O S
    "#
    );
}
