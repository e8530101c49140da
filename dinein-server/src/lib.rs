//! Dine-in Server - 堂食点餐的权威状态存储
//!
//! # 架构概述
//!
//! - **桌台** (`tables`): 桌台 / 会话 / 账本的内存存储与生命周期编排
//! - **菜单** (`catalog`): 只读菜单 + 上下架
//! - **通知** (`notifications`): 新订单、呼叫、结账请求 (at-least-once)
//! - **HTTP API** (`api`): RESTful 接口，员工端与顾客端共用
//!
//! 状态迁移规则本身位于 `shared`，服务端只负责持有状态并串行化写入。
//!
//! # 模块结构
//!
//! ```text
//! dinein-server/src/
//! ├── core/           # 配置、状态、错误、后台任务
//! ├── tables/         # TablesManager + Store
//! ├── catalog/        # 菜单服务
//! ├── notifications/  # 通知中心
//! ├── api/            # HTTP 路由和处理器
//! ├── routes/         # Router 组装与中间件
//! └── utils/          # 日志等工具
//! ```

pub mod api;
pub mod catalog;
pub mod core;
pub mod notifications;
pub mod routes;
pub mod tables;
pub mod utils;

// Re-export 公共类型
pub use catalog::CatalogService;
pub use core::{Config, Server, ServerState};
pub use notifications::NotificationHub;
pub use routes::build_app;
pub use tables::TablesManager;

// Re-export unified error types from shared
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

/// 加载 .env、读取配置并初始化日志
pub fn setup_environment() -> AppResult<Config> {
    let dotenv_path = dotenv::dotenv().ok();
    let config = Config::from_env()?;
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    );
    if let Some(path) = dotenv_path {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ____  _                    _
   / __ \(_)___  ___        (_)___
  / / / / / __ \/ _ \______/ / __ \
 / /_/ / / / / /  __/_____/ / / / /
/_____/_/_/ /_/\___/     /_/_/ /_/
    "#
    );
}
