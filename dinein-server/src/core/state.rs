use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;

use crate::catalog::CatalogService;
use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::notifications::NotificationHub;
use crate::tables::TablesManager;

/// 桌台一致性巡检间隔
const AUDIT_INTERVAL: Duration = Duration::from_secs(60);

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个 handler 拿到的都是同一份状态。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | catalog | Arc<CatalogService> | 菜单 |
/// | notifications | Arc<NotificationHub> | 通知中心 |
/// | tables | Arc<TablesManager> | 桌台/会话/账本 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub catalog: Arc<CatalogService>,
    pub notifications: Arc<NotificationHub>,
    pub tables: Arc<TablesManager>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 加载菜单 (文件或内置)，创建通知中心和桌台管理器。
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        let catalog = Arc::new(CatalogService::load(config.catalog_path.as_deref())?);
        let notifications = Arc::new(NotificationHub::new(config.notification_retention));
        let tables = Arc::new(TablesManager::new(
            config.table_count,
            catalog.clone(),
            notifications.clone(),
        ));
        Ok(Self {
            config: config.clone(),
            catalog,
            notifications,
            tables,
        })
    }

    /// 启动后台任务
    ///
    /// - notification_log: 订阅通知广播并写日志
    /// - table_audit: 定期检查 status / session_id 一致性
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let token = tasks.shutdown_token();
        let mut rx = self.notifications.subscribe();
        tasks.spawn("notification_log", TaskKind::Listener, async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    received = rx.recv() => match received {
                        Ok(n) => tracing::info!(
                            notification_id = n.notification_id,
                            table_id = n.table_id,
                            kind = ?n.kind,
                            message = %n.message,
                            "Notification"
                        ),
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Notification listener lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        });

        let token = tasks.shutdown_token();
        let tables = self.tables.clone();
        tasks.spawn("table_audit", TaskKind::Periodic, async move {
            let mut interval = tokio::time::interval(AUDIT_INTERVAL);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let broken: Vec<i64> = tables
                            .list_tables()
                            .iter()
                            .filter(|t| !t.is_consistent())
                            .map(|t| t.table_id)
                            .collect();
                        if broken.is_empty() {
                            tracing::debug!(
                                active_sessions = tables.active_sessions(),
                                "Table audit passed"
                            );
                        } else {
                            tracing::error!(tables = ?broken, "Table status and session binding disagree");
                        }
                    }
                }
            }
        });

        tasks.log_summary();
        tasks
    }
}
