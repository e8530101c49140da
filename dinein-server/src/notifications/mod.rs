//! Notification Hub
//!
//! 通知是 fire-and-forget 的跨面板信号：
//! - 保留最新 `retention` 条，供轮询 (`since_id`) 读取
//! - 同时通过 broadcast 通道推送给进程内订阅者
//!
//! 投递语义为 at-least-once：客户端按 `notification_id` 去重。
//! 没有订阅者或订阅者落后都不会阻塞状态迁移。
//!
//! `notification_id` 在写锁内分配，严格按入队顺序递增，
//! 所以 `since_id = 已见最大 id` 不会漏掉任何一条。

use parking_lot::RwLock;
use shared::error::{PosError, PosResult, Resource};
use shared::models::{Notification, NotificationType};
use shared::util::now_millis;
use std::collections::VecDeque;
use tokio::sync::broadcast;

/// Broadcast channel capacity
const CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug)]
struct Retained {
    items: VecDeque<Notification>,
    /// Next id to hand out, only advanced under the write lock
    next_id: i64,
}

#[derive(Debug)]
pub struct NotificationHub {
    retained: RwLock<Retained>,
    retention: usize,
    tx: broadcast::Sender<Notification>,
}

impl NotificationHub {
    pub fn new(retention: usize) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            // 以启动时刻为起点，重启后新 id 仍大于客户端已见的旧 id
            retained: RwLock::new(Retained {
                items: VecDeque::new(),
                next_id: now_millis().max(1),
            }),
            retention: retention.max(1),
            tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn push(&self, table_id: i64, kind: NotificationType, message: impl Into<String>) -> Notification {
        let message = message.into();
        let notification = {
            let mut retained = self.retained.write();
            let notification = Notification {
                notification_id: retained.next_id,
                table_id,
                kind,
                message,
                created_at: now_millis(),
                read: false,
            };
            retained.next_id += 1;
            retained.items.push_back(notification.clone());
            while retained.items.len() > self.retention {
                if let Some(dropped) = retained.items.pop_front() {
                    tracing::debug!(
                        notification_id = dropped.notification_id,
                        "Notification dropped by retention"
                    );
                }
            }
            notification
        };

        if self.tx.send(notification.clone()).is_err() {
            tracing::debug!(
                notification_id = notification.notification_id,
                "No live notification subscribers"
            );
        }
        notification
    }

    /// Retained notifications, oldest first
    pub fn list(&self, since_id: Option<i64>, unread_only: bool) -> Vec<Notification> {
        self.retained
            .read()
            .items
            .iter()
            .filter(|n| since_id.is_none_or(|since| n.notification_id > since))
            .filter(|n| !unread_only || !n.read)
            .cloned()
            .collect()
    }

    pub fn mark_read(&self, notification_id: i64) -> PosResult<Notification> {
        let mut retained = self.retained.write();
        let notification = retained
            .items
            .iter_mut()
            .find(|n| n.notification_id == notification_id)
            .ok_or_else(|| PosError::not_found(Resource::Notification, notification_id))?;
        notification.read = true;
        Ok(notification.clone())
    }

    /// Returns how many were newly marked
    pub fn mark_all_read(&self) -> usize {
        let mut updated = 0;
        for notification in self.retained.write().items.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            updated += 1;
        }
        updated
    }

    pub fn len(&self) -> usize {
        self.retained.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
