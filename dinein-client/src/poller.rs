//! 轮询器 - 两个独立循环
//!
//! - fast: new notifications + pending item detection
//! - slow: full table refresh
//!
//! They are separate tasks so a slow refresh never delays new-order
//! detection. Both stop on the shared [`CancellationToken`].

use shared::models::Notification;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{ClientConfig, StaffPanel};

/// Buffered notifications not yet taken by the UI
const NOTIFICATION_BUFFER: usize = 256;

#[derive(Debug)]
pub struct Poller {
    token: CancellationToken,
    handles: Vec<(&'static str, JoinHandle<()>)>,
    notifications: mpsc::Receiver<Notification>,
}

impl Poller {
    pub fn spawn(panel: StaffPanel, config: &ClientConfig) -> Self {
        let token = CancellationToken::new();
        let (tx, rx) = mpsc::channel(NOTIFICATION_BUFFER);

        let fast = tokio::spawn(fast_loop(
            panel.clone(),
            config.fast_poll_interval,
            tx,
            token.clone(),
        ));
        let slow = tokio::spawn(slow_loop(panel, config.slow_poll_interval, token.clone()));

        tracing::info!(
            fast_ms = config.fast_poll_interval.as_millis() as u64,
            slow_ms = config.slow_poll_interval.as_millis() as u64,
            "Poller started"
        );

        Self {
            token,
            handles: vec![("fast", fast), ("slow", slow)],
            notifications: rx,
        }
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Next first-time notification
    pub async fn recv(&mut self) -> Option<Notification> {
        self.notifications.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Notification> {
        self.notifications.try_recv().ok()
    }

    pub async fn shutdown(self) {
        self.token.cancel();
        for (name, handle) in self.handles {
            if let Err(e) = handle.await {
                tracing::error!(task = name, error = %e, "Poll loop ended abnormally");
            }
        }
        tracing::info!("Poller stopped");
    }
}

async fn fast_loop(
    panel: StaffPanel,
    period: Duration,
    tx: mpsc::Sender<Notification>,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        match panel.poll_notifications().await {
            Ok(fresh) => {
                for notification in fresh {
                    if let Err(e) = tx.try_send(notification) {
                        tracing::debug!(error = %e, "Dropped notification");
                    }
                }
            }
            Err(e) => tracing::warn!(error = %e, "Notification poll failed"),
        }
    }
}

async fn slow_loop(panel: StaffPanel, period: Duration, token: CancellationToken) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        if let Err(e) = panel.refresh_all().await {
            tracing::warn!(error = %e, "Full refresh failed");
        }
        panel.locks().prune();
    }
}
