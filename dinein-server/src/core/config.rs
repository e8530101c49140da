/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | TABLE_COUNT | 12 | 启动时创建的桌台数量 |
/// | CATALOG_PATH | (内置菜单) | 菜单 JSON 文件 |
/// | CUSTOMER_BASE_URL | http://localhost:3000/order | 二维码指向的顾客点餐页 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志目录，存在时按天滚动写文件 |
/// | LOG_JSON | false | JSON 格式日志 |
/// | ENVIRONMENT | development | 运行环境 |
/// | NOTIFICATION_RETENTION | 500 | 保留的最新通知条数 |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 TABLE_COUNT=20 cargo run -p dinein-server
/// ```
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 桌台数量 (table_id 1..=N)
    pub table_count: usize,
    /// 菜单文件路径，未设置时使用内置菜单
    pub catalog_path: Option<String>,
    /// 顾客点餐页地址，用于生成 qr_payload
    pub customer_base_url: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub log_json: bool,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 通知保留条数
    pub notification_retention: usize,
}

/// 未设置或为空时取默认值；设置了但无法解析则报 ConfigError，不静默回退
fn parse_var<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> AppResult<T> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| {
            AppError::with_message(
                ErrorCode::ConfigError,
                format!("{key} has an invalid value: {value:?}"),
            )
            .with_detail("key", key)
        }),
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> AppResult<T> {
    parse_var(key, std::env::var(key).ok(), default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的项使用默认值；数值/布尔项格式错误时返回 `ConfigError`
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            http_port: env_or("HTTP_PORT", defaults.http_port)?,
            table_count: env_or("TABLE_COUNT", defaults.table_count)?,
            catalog_path: std::env::var("CATALOG_PATH").ok().filter(|p| !p.is_empty()),
            customer_base_url: std::env::var("CUSTOMER_BASE_URL")
                .unwrap_or(defaults.customer_base_url),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: std::env::var("LOG_DIR").ok().filter(|p| !p.is_empty()),
            log_json: env_or("LOG_JSON", defaults.log_json)?,
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            notification_retention: env_or(
                "NOTIFICATION_RETENTION",
                defaults.notification_retention,
            )?,
        })
    }

    /// 使用自定义桌台数量的默认配置 (不读环境变量)
    ///
    /// 常用于测试场景
    pub fn with_tables(table_count: usize) -> Self {
        Self {
            table_count,
            ..Self::default()
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 顾客扫码地址
    pub fn qr_payload(&self, table_id: i64, session_id: &str) -> String {
        format!(
            "{}?table={}&session={}",
            self.customer_base_url.trim_end_matches('/'),
            table_id,
            session_id
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 3000,
            table_count: 12,
            catalog_path: None,
            customer_base_url: "http://localhost:3000/order".into(),
            log_level: "info".into(),
            log_dir: None,
            log_json: false,
            environment: "development".into(),
            notification_retention: 500,
        }
    }
}
