//! 员工端 - 桌台管理 + 厨房处理
//!
//! Every mutation:
//! 1. holds the entity lock (`Table(id)` or `Item(id)`) for its whole duration
//! 2. calls the backend
//! 3. re-fetches the table and its orders, whether the call succeeded or not
//!
//! Checkout and payment are bounded by `mutation_timeout`. On expiry the
//! table is marked stale and [`ClientError::Uncertain`] is returned; nothing
//! is retried automatically.

use futures::future::join_all;
use parking_lot::RwLock;
use shared::PosError;
use shared::models::{DiningTable, MenuItem, Notification, NotificationType};
use shared::order::{BulkReport, CheckoutSnapshot, ItemAction, SessionOrders};
use shared::request::NotificationQuery;
use shared::response::{IssuedSession, ItemResponse};
use shared::table::{TableActions, TableEvent};
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::locks::{EntityKey, EntityLocks};
use crate::view::LocalView;
use crate::{ClientConfig, ClientError, ClientResult, PosBackend};

#[derive(Clone)]
pub struct StaffPanel {
    backend: Arc<dyn PosBackend>,
    view: Arc<RwLock<LocalView>>,
    locks: EntityLocks,
    mutation_timeout: Duration,
}

impl std::fmt::Debug for StaffPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaffPanel")
            .field("mutation_timeout", &self.mutation_timeout)
            .field("locks", &self.locks.len())
            .finish_non_exhaustive()
    }
}

impl StaffPanel {
    pub fn new(backend: Arc<dyn PosBackend>, config: &ClientConfig) -> Self {
        Self {
            backend,
            view: Arc::new(RwLock::new(LocalView::new())),
            locks: EntityLocks::new(),
            mutation_timeout: config.mutation_timeout,
        }
    }

    /// Read the local projection
    pub fn with_view<R>(&self, f: impl FnOnce(&LocalView) -> R) -> R {
        f(&self.view.read())
    }

    pub fn locks(&self) -> &EntityLocks {
        &self.locks
    }

    // ========== Sync ==========

    /// Full refresh: every table plus the orders of every bound session
    pub async fn refresh_all(&self) -> ClientResult<usize> {
        let tables = self.backend.list_tables().await?;
        let fetches = tables
            .iter()
            .filter_map(|t| t.session_id.as_deref().map(|sid| (t.table_id, sid)))
            .map(|(table_id, sid)| self.backend.session_orders(table_id, sid));
        let orders: Vec<SessionOrders> = join_all(fetches)
            .await
            .into_iter()
            .filter_map(|r| match r {
                Ok(orders) => Some(orders),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to fetch session orders");
                    None
                }
            })
            .collect();

        let count = tables.len();
        let mut view = self.view.write();
        view.refresh_tables(tables);
        for o in orders {
            view.apply_orders(o);
        }
        tracing::debug!(tables = count, "Full refresh done");
        Ok(count)
    }

    /// Re-fetch one table and its current session's orders
    pub async fn refresh_table(&self, table_id: i64) -> ClientResult<DiningTable> {
        let table = self.backend.table(table_id).await?;
        let orders = match table.session_id.as_deref() {
            Some(sid) => Some(self.backend.session_orders(table_id, sid).await?),
            None => None,
        };

        let mut view = self.view.write();
        view.apply_table(table.clone());
        if let Some(orders) = orders {
            view.apply_orders(orders);
        }
        Ok(table)
    }

    /// Fetch notifications newer than the last one seen and refresh tables
    /// that received new orders. Returns only first-time notifications.
    pub async fn poll_notifications(&self) -> ClientResult<Vec<Notification>> {
        let since_id = self.view.read().last_notification_id();
        let notifications = self
            .backend
            .notifications(NotificationQuery {
                since_id,
                unread_only: false,
            })
            .await?;
        let fresh = self.view.write().apply_notifications(notifications);

        let ordered: BTreeSet<i64> = fresh
            .iter()
            .filter(|n| n.kind == NotificationType::NewOrder)
            .map(|n| n.table_id)
            .collect();
        for table_id in ordered {
            self.resync(table_id).await;
        }
        Ok(fresh)
    }

    pub async fn mark_read(&self, notification_id: i64) -> ClientResult<Notification> {
        self.backend.mark_read(notification_id).await
    }

    // ========== Table lifecycle ==========

    /// 开台
    pub async fn open_table(&self, table_id: i64) -> ClientResult<IssuedSession> {
        let _guard = self.locks.lock(EntityKey::Table(table_id)).await;
        let result = self.backend.issue_session(table_id).await;
        self.resync(table_id).await;
        let issued = result?;
        tracing::info!(table_id, session_id = %issued.session_id, "Table opened");
        Ok(issued)
    }

    /// 结账 (bounded)
    pub async fn checkout(&self, table_id: i64) -> ClientResult<CheckoutSnapshot> {
        let _guard = self.locks.lock(EntityKey::Table(table_id)).await;
        let table = self.refresh_table(table_id).await?;
        let Some(session_id) = table.session_id else {
            return Err(PosError::InvalidTableTransition {
                table_id,
                from: table.status,
                event: TableEvent::RequestCheckout,
                reason: "table has no active session".to_string(),
            }
            .into());
        };

        let result = self
            .bounded(table_id, "checkout", self.backend.checkout(table_id, &session_id))
            .await;
        if matches!(&result, Err(e) if e.is_uncertain()) {
            return result.map(|r| r.snapshot);
        }
        self.resync(table_id).await;
        let response = result?;
        tracing::info!(table_id, total = %response.snapshot.total_amount, "Checkout done");
        Ok(response.snapshot)
    }

    /// 确认收款 (bounded)
    pub async fn confirm_payment(&self, table_id: i64) -> ClientResult<DiningTable> {
        let _guard = self.locks.lock(EntityKey::Table(table_id)).await;
        let result = self
            .bounded(table_id, "payment", self.backend.payment_complete(table_id))
            .await;
        if matches!(&result, Err(e) if e.is_uncertain()) {
            return result;
        }
        self.after_mutation(table_id, result).await
    }

    /// 清台；占用中的桌台需要 `force`
    pub async fn clear_table(&self, table_id: i64, force: bool) -> ClientResult<DiningTable> {
        let _guard = self.locks.lock(EntityKey::Table(table_id)).await;
        let result = self.backend.clear_table(table_id, force).await;
        self.after_mutation(table_id, result).await
    }

    pub async fn acknowledge_call(&self, table_id: i64) -> ClientResult<DiningTable> {
        let _guard = self.locks.lock(EntityKey::Table(table_id)).await;
        let result = self.backend.acknowledge_call(table_id).await;
        self.after_mutation(table_id, result).await
    }

    /// Server-derived actions for a freshly fetched table
    pub async fn actions(&self, table_id: i64) -> ClientResult<TableActions> {
        self.refresh_table(table_id).await?;
        self.backend.actions(table_id).await
    }

    pub async fn receipt(&self, table_id: i64) -> ClientResult<CheckoutSnapshot> {
        self.backend.receipt(table_id).await
    }

    // ========== Kitchen ==========

    pub async fn accept_item(&self, order_item_id: i64) -> ClientResult<ItemResponse> {
        self.transition_item(order_item_id, ItemAction::Accept).await
    }

    pub async fn reject_item(&self, order_item_id: i64) -> ClientResult<ItemResponse> {
        self.transition_item(order_item_id, ItemAction::Reject).await
    }

    pub async fn complete_item(&self, order_item_id: i64) -> ClientResult<ItemResponse> {
        self.transition_item(order_item_id, ItemAction::Complete).await
    }

    async fn transition_item(&self, order_item_id: i64, action: ItemAction) -> ClientResult<ItemResponse> {
        let _guard = self.locks.lock(EntityKey::Item(order_item_id)).await;
        let known_table = self.view.read().item(order_item_id).map(|i| i.table_id);

        let result = self.backend.item_transition(order_item_id, action).await;
        match &result {
            Ok(resp) => {
                self.view.write().apply_item(resp.item.clone());
                self.resync(resp.table.table_id).await;
            }
            Err(e) => {
                tracing::warn!(order_item_id, %action, error = %e, "Item transition refused");
                if let Some(table_id) = known_table {
                    self.resync(table_id).await;
                }
            }
        }
        result
    }

    pub async fn accept_all(&self, table_id: i64) -> ClientResult<BulkReport> {
        self.bulk(table_id, ItemAction::Accept).await
    }

    pub async fn complete_all(&self, table_id: i64) -> ClientResult<BulkReport> {
        self.bulk(table_id, ItemAction::Complete).await
    }

    async fn bulk(&self, table_id: i64, action: ItemAction) -> ClientResult<BulkReport> {
        let _guard = self.locks.lock(EntityKey::Table(table_id)).await;
        let result = self.backend.bulk(table_id, action, None).await;
        self.resync(table_id).await;
        let report = result?.report;
        if report.is_partial_failure() {
            tracing::warn!(
                table_id,
                %action,
                failed = report.failed.len(),
                total = report.total(),
                "Bulk action partially failed"
            );
        }
        Ok(report)
    }

    // ========== Ledger edits ==========

    pub async fn change_quantity(&self, order_item_id: i64, quantity: i32) -> ClientResult<ItemResponse> {
        let _guard = self.locks.lock(EntityKey::Item(order_item_id)).await;
        let known_table = self.view.read().item(order_item_id).map(|i| i.table_id);
        let result = self.backend.change_quantity(order_item_id, quantity).await;
        let table_id = result.as_ref().ok().map(|r| r.table.table_id).or(known_table);
        if let Some(table_id) = table_id {
            self.resync(table_id).await;
        }
        result
    }

    pub async fn remove_item(&self, order_item_id: i64) -> ClientResult<()> {
        let _guard = self.locks.lock(EntityKey::Item(order_item_id)).await;
        let known_table = self.view.read().item(order_item_id).map(|i| i.table_id);
        let result = self.backend.remove_item(order_item_id).await;
        if let Ok(removed) = &result {
            self.view.write().apply_removed(&removed.removed);
        }
        let table_id = result.as_ref().ok().map(|r| r.table.table_id).or(known_table);
        if let Some(table_id) = table_id {
            self.resync(table_id).await;
        }
        result.map(|_| ())
    }

    // ========== Catalog ==========

    pub async fn set_availability(&self, item_id: i64, available: bool) -> ClientResult<MenuItem> {
        self.backend.set_availability(item_id, available).await
    }

    // ========== helpers ==========

    /// Re-fetch after a mutation, success or failure, then hand back the result
    async fn after_mutation<T>(&self, table_id: i64, result: ClientResult<T>) -> ClientResult<T> {
        self.resync(table_id).await;
        result
    }

    async fn resync(&self, table_id: i64) {
        if let Err(e) = self.refresh_table(table_id).await {
            tracing::warn!(table_id, error = %e, "Re-fetch after mutation failed");
            self.view.write().mark_stale(table_id);
        }
    }

    /// Bound a call by `mutation_timeout`; expiry means the outcome is unknown
    async fn bounded<T>(
        &self,
        table_id: i64,
        operation: &str,
        call: impl Future<Output = ClientResult<T>>,
    ) -> ClientResult<T> {
        let result = match tokio::time::timeout(self.mutation_timeout, call).await {
            Ok(Err(ClientError::Http(e))) if e.is_timeout() => Err(ClientError::uncertain(operation)),
            Ok(result) => result,
            Err(_) => Err(ClientError::uncertain(operation)),
        };
        if matches!(&result, Err(e) if e.is_uncertain()) {
            tracing::warn!(table_id, operation, "Outcome uncertain; re-validate before retrying");
            self.view.write().mark_stale(table_id);
        }
        result
    }
}
