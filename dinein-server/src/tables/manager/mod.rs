//! TablesManager - 堂食生命周期编排
//!
//! 所有 mutation 走同一个写锁，因此同一桌台/同一菜品的并发操作被串行化，
//! 不会出现交错的状态迁移。
//!
//! # Mutation Flow
//!
//! ```text
//! operation(args)
//!     ├─ 1. Acquire store write lock
//!     ├─ 2. Resolve table / session / ledger context
//!     ├─ 3. Plan the transition (refusal → PosError, nothing written)
//!     ├─ 4. Apply to table, session record and ledger
//!     ├─ 5. Release lock
//!     └─ 6. Push notification (fire-and-forget)
//! ```

use super::store::Store;
use crate::catalog::CatalogService;
use crate::notifications::NotificationHub;
use parking_lot::RwLock;
use shared::error::{PosError, Resource};
use shared::models::{
    DiningTable, NotificationType, OrderItem, OrderItemStatus, SessionValidation, TableSession, TableStatus,
};
use shared::order::{
    BulkFailure, BulkReport, CheckoutSnapshot, ItemAction, Ledger, LedgerSummary, OrderBuilder,
    OrderSelection, SessionOrders,
};
use shared::response::{
    BulkResponse, CheckoutResponse, ItemResponse, PurgedSession, RejectedLine, RemovedItem,
    SubmitOrderResponse,
};
use shared::table::{CallKind, TableActions, TableEvent, plan, session};
use shared::util::now_millis;
use std::sync::Arc;

pub type ManagerResult<T> = Result<T, PosError>;

pub struct TablesManager {
    store: RwLock<Store>,
    catalog: Arc<CatalogService>,
    notifications: Arc<NotificationHub>,
}

impl std::fmt::Debug for TablesManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TablesManager")
            .field("store", &"<Store>")
            .field("tables", &self.store.read().tables.len())
            .finish()
    }
}

impl TablesManager {
    pub fn new(
        table_count: usize,
        catalog: Arc<CatalogService>,
        notifications: Arc<NotificationHub>,
    ) -> Self {
        tracing::info!(table_count, "TablesManager started");
        Self {
            store: RwLock::new(Store::with_tables(table_count)),
            catalog,
            notifications,
        }
    }

    // ========== Queries ==========

    pub fn list_tables(&self) -> Vec<DiningTable> {
        self.store.read().tables.values().cloned().collect()
    }

    pub fn get_table(&self, table_id: i64) -> ManagerResult<DiningTable> {
        self.store.read().table(table_id).cloned()
    }

    pub fn table_count(&self) -> usize {
        self.store.read().tables.len()
    }

    pub fn active_sessions(&self) -> usize {
        self.store.read().active_sessions()
    }

    pub fn validate_session(
        &self,
        table_id: i64,
        session_id: &str,
    ) -> ManagerResult<SessionValidation> {
        let store = self.store.read();
        let table = store.table(table_id)?;
        Ok(session::validate(
            table,
            session_id,
            store.sessions.get(session_id),
        ))
    }

    /// Orders of a session, including closed ones still in memory
    pub fn session_orders(&self, table_id: i64, session_id: &str) -> ManagerResult<SessionOrders> {
        let store = self.store.read();
        store.table(table_id)?;
        let record = store.session(session_id)?;
        if record.table_id != table_id {
            return Err(PosError::not_found(Resource::Session, session_id));
        }
        let ledger = store.ledger(session_id)?;
        Ok(SessionOrders::compute(table_id, session_id, ledger.items()))
    }

    pub fn actions(&self, table_id: i64) -> ManagerResult<TableActions> {
        let store = self.store.read();
        let table = store.table(table_id)?;
        Ok(TableActions::derive(table.status, &store.summary_for(table)))
    }

    /// Rebuild the checkout snapshot for printing
    ///
    /// Only while the table sits in a receipt-ready status.
    pub fn receipt(&self, table_id: i64) -> ManagerResult<CheckoutSnapshot> {
        let store = self.store.read();
        let table = store.table(table_id)?;
        if !table.status.is_receipt_ready() {
            return Err(PosError::ReceiptNotReady {
                table_id,
                status: table.status,
            });
        }
        let sid = table
            .session_id
            .as_deref()
            .ok_or_else(|| PosError::not_found(Resource::Session, table_id))?;
        let record = store.session(sid)?;
        let ledger = store.ledger(sid)?;
        let checkout_at = table
            .checkout_at
            .or(record.checkout_at)
            .unwrap_or(table.updated_at);
        Ok(CheckoutSnapshot::compute(
            table_id,
            sid,
            record.created_at,
            ledger.items(),
            checkout_at,
        ))
    }

    // ========== Session lifecycle ==========

    pub fn issue_session(&self, table_id: i64) -> ManagerResult<(DiningTable, TableSession)> {
        let now = now_millis();
        let mut store = self.store.write();
        let Store {
            tables,
            sessions,
            ledgers,
            ..
        } = &mut *store;
        let table = tables
            .get_mut(&table_id)
            .ok_or_else(|| PosError::not_found(Resource::Table, table_id))?;

        let session = session::issue(table, now).inspect_err(|e| {
            tracing::warn!(table_id, status = %table.status, error = %e, "Session issue refused");
        })?;
        ledgers.insert(
            session.session_id.clone(),
            Ledger::new(table_id, &session.session_id),
        );
        sessions.insert(session.session_id.clone(), session.clone());

        tracing::info!(table_id, session_id = %session.session_id, "Session issued");
        Ok((table.clone(), session))
    }

    /// Drop a closed session's record and ledger
    pub fn purge_session(&self, session_id: &str) -> ManagerResult<PurgedSession> {
        let mut store = self.store.write();
        let record = store.session(session_id)?;
        if record.is_active() {
            return Err(PosError::SessionStillActive {
                session_id: session_id.to_string(),
            });
        }

        let removed_items = store
            .ledgers
            .remove(session_id)
            .map(Ledger::into_items)
            .unwrap_or_default();
        for item in &removed_items {
            store.item_index.remove(&item.order_item_id);
        }
        store.sessions.remove(session_id);

        tracing::info!(session_id, removed_items = removed_items.len(), "Session purged");
        Ok(PurgedSession {
            session_id: session_id.to_string(),
            removed_items: removed_items.len(),
        })
    }

    // ========== Ordering ==========

    /// Append a customer order to the session's ledger
    ///
    /// Each line is built on its own: an unavailable item rejects only its
    /// line. If no line survives the first error is returned.
    pub fn submit_order(
        &self,
        session_id: &str,
        selections: &[OrderSelection],
    ) -> ManagerResult<SubmitOrderResponse> {
        if selections.is_empty() {
            return Err(PosError::Validation("order has no items".to_string()));
        }
        let now = now_millis();

        let (table, accepted, rejected) = {
            let mut store = self.store.write();
            let Store {
                tables,
                sessions,
                ledgers,
                item_index,
            } = &mut *store;

            let record = sessions
                .get(session_id)
                .ok_or_else(|| PosError::not_found(Resource::Session, session_id))?;
            let table = tables
                .get(&record.table_id)
                .ok_or_else(|| PosError::not_found(Resource::Table, record.table_id))?;
            if let Some(reason) = session::validate(table, session_id, Some(record)).reason {
                tracing::warn!(
                    table_id = table.table_id,
                    session_id,
                    reason = reason.as_str(),
                    "Order from invalid session refused"
                );
                return Err(PosError::SessionInvalid(reason));
            }
            plan(
                table.table_id,
                table.status,
                TableEvent::SubmitOrder,
                &LedgerSummary::default(),
            )?;

            let catalog = self.catalog.read();
            let mut drafts = Vec::with_capacity(selections.len());
            let mut rejected = Vec::new();
            let mut first_error = None;
            for (index, selection) in selections.iter().enumerate() {
                match OrderBuilder::from_selection(&catalog, selection) {
                    Ok(draft) => drafts.push(draft),
                    Err(e) => {
                        tracing::warn!(
                            table_id = table.table_id,
                            item_id = selection.item_id,
                            error = %e,
                            "Order line rejected"
                        );
                        rejected.push(RejectedLine {
                            index,
                            item_id: selection.item_id,
                            code: e.code(),
                            reason: e.to_string(),
                        });
                        first_error.get_or_insert(e);
                    }
                }
            }
            if drafts.is_empty() {
                return Err(first_error
                    .unwrap_or_else(|| PosError::Validation("order has no items".to_string())));
            }

            let ledger = ledgers
                .get_mut(session_id)
                .ok_or_else(|| PosError::not_found(Resource::Session, session_id))?;
            let accepted: Vec<OrderItem> = drafts
                .into_iter()
                .map(|draft| {
                    let item = ledger.append(draft, now).clone();
                    item_index.insert(item.order_item_id, session_id.to_string());
                    item
                })
                .collect();
            (table.clone(), accepted, rejected)
        };

        tracing::info!(
            table_id = table.table_id,
            session_id,
            accepted = accepted.len(),
            rejected = rejected.len(),
            "Order submitted"
        );
        self.notifications.push(
            table.table_id,
            NotificationType::NewOrder,
            format!("{} สั่งอาหาร {} รายการ", table.name, accepted.len()),
        );
        Ok(SubmitOrderResponse {
            accepted,
            rejected,
            table,
        })
    }

    // ========== Kitchen ==========

    pub fn transition_item(
        &self,
        order_item_id: i64,
        action: ItemAction,
    ) -> ManagerResult<ItemResponse> {
        let now = now_millis();
        let mut store = self.store.write();
        let mut ctx = store.item_context(order_item_id)?;
        if let Some(reason) = ctx.session.close_reason {
            tracing::warn!(order_item_id, action = %action, "Item action on closed visit refused");
            return Err(PosError::SessionInvalid(reason.into()));
        }

        let item = ctx
            .ledger
            .apply(order_item_id, action, now)
            .inspect_err(|e| {
                tracing::warn!(order_item_id, action = %action, error = %e, "Item transition refused");
            })?
            .clone();

        tracing::info!(
            table_id = ctx.table.table_id,
            order_item_id,
            status = %item.status,
            "Order item transitioned"
        );
        Ok(ItemResponse {
            item_status: item.status,
            item,
            table: ctx.table.clone(),
        })
    }

    /// Apply `action` to each listed item, or to every eligible item
    ///
    /// Successes are kept even when some items fail.
    pub fn bulk(
        &self,
        table_id: i64,
        action: ItemAction,
        order_item_ids: Option<Vec<i64>>,
    ) -> ManagerResult<BulkResponse> {
        let now = now_millis();
        let mut store = self.store.write();
        let ctx = store.table_context(table_id)?;

        let report = match ctx.ledger {
            Some(ledger) if ctx.table.status.has_session() => match order_item_ids {
                Some(ids) => ledger.apply_each(&ids, action, now),
                None => match action {
                    ItemAction::Accept => ledger.accept_all(now),
                    ItemAction::Complete => ledger.complete_all(now),
                    ItemAction::Reject => {
                        let pending = ledger.ids_with_status(OrderItemStatus::Pending);
                        ledger.apply_each(&pending, action, now)
                    }
                },
            },
            _ => BulkReport {
                succeeded: Vec::new(),
                failed: order_item_ids
                    .unwrap_or_default()
                    .into_iter()
                    .map(|id| {
                        let e = PosError::not_found(Resource::OrderItem, id);
                        BulkFailure {
                            order_item_id: id,
                            code: e.code(),
                            reason: e.to_string(),
                        }
                    })
                    .collect(),
            },
        };

        if report.is_partial_failure() {
            tracing::warn!(
                table_id,
                action = %action,
                succeeded = report.succeeded.len(),
                failed = report.failed.len(),
                "Bulk item action partially failed"
            );
        } else {
            tracing::info!(
                table_id,
                action = %action,
                succeeded = report.succeeded.len(),
                "Bulk item action applied"
            );
        }
        Ok(BulkResponse {
            report,
            table: ctx.table.clone(),
        })
    }

    // ========== Edits ==========

    pub fn change_quantity(&self, order_item_id: i64, quantity: i32) -> ManagerResult<ItemResponse> {
        let now = now_millis();
        let mut store = self.store.write();
        let mut ctx = store.item_context(order_item_id)?;
        let status = editable_status(ctx.table, ctx.is_current(), order_item_id)?;

        let item = ctx
            .ledger
            .change_quantity(status, order_item_id, quantity, now)?
            .clone();
        tracing::info!(order_item_id, quantity, "Order item quantity changed");
        Ok(ItemResponse {
            item_status: item.status,
            item,
            table: ctx.table.clone(),
        })
    }

    pub fn remove_item(&self, order_item_id: i64) -> ManagerResult<RemovedItem> {
        let mut store = self.store.write();
        let mut ctx = store.item_context(order_item_id)?;
        let status = editable_status(ctx.table, ctx.is_current(), order_item_id)?;

        let removed = ctx.ledger.remove(status, order_item_id)?;
        let table = ctx.table.clone();
        store.item_index.remove(&order_item_id);

        tracing::info!(order_item_id, table_id = table.table_id, "Order item removed");
        Ok(RemovedItem { removed, table })
    }

    // ========== Table lifecycle ==========

    /// Freeze the bill: guard, move to `waiting_payment`, snapshot
    pub fn checkout(&self, table_id: i64, session_id: &str) -> ManagerResult<CheckoutResponse> {
        let now = now_millis();
        let (snapshot, table) = {
            let mut store = self.store.write();
            let validation = {
                let table = store.table(table_id)?;
                session::validate(table, session_id, store.sessions.get(session_id))
            };
            if let Some(reason) = validation.reason {
                tracing::warn!(table_id, session_id, reason = reason.as_str(), "Checkout with invalid session refused");
                return Err(PosError::SessionInvalid(reason));
            }

            let mut ctx = store.table_context(table_id)?;
            let transition = plan(
                table_id,
                ctx.table.status,
                TableEvent::RequestCheckout,
                &ctx.summary(),
            )
            .inspect_err(|e| {
                tracing::warn!(table_id, session_id, error = %e, "Checkout refused");
            })?;

            let (Some(record), Some(ledger)) = (ctx.session, ctx.ledger) else {
                return Err(PosError::not_found(Resource::Session, session_id));
            };
            ctx.table.status = transition.to;
            ctx.table.checkout_at = Some(now);
            ctx.table.updated_at = now;
            record.checkout_at = Some(now);

            let snapshot =
                CheckoutSnapshot::compute(table_id, session_id, record.created_at, ledger.items(), now);
            (snapshot, ctx.table.clone())
        };

        tracing::info!(
            table_id,
            session_id,
            total = %snapshot.total_amount,
            "Checkout completed"
        );
        self.notifications.push(
            table_id,
            NotificationType::CheckoutRequest,
            format!("{} เช็คบิล {} บาท", table.name, snapshot.total_amount),
        );
        Ok(CheckoutResponse { snapshot, table })
    }

    pub fn payment_complete(&self, table_id: i64) -> ManagerResult<DiningTable> {
        self.apply_table_event(table_id, TableEvent::ConfirmPayment)
    }

    pub fn clear_table(&self, table_id: i64, force: bool) -> ManagerResult<DiningTable> {
        self.apply_table_event(table_id, TableEvent::Clear { force })
    }

    pub fn call(&self, table_id: i64, kind: CallKind) -> ManagerResult<DiningTable> {
        let table = self.apply_table_event(table_id, TableEvent::Call(kind))?;
        let (notification_type, message) = match kind {
            CallKind::Staff => (NotificationType::CallStaff, format!("{} เรียกพนักงาน", table.name)),
            CallKind::Bill => (NotificationType::CallBill, format!("{} ขอเช็คบิล", table.name)),
        };
        self.notifications.push(table_id, notification_type, message);
        Ok(table)
    }

    pub fn acknowledge_call(&self, table_id: i64) -> ManagerResult<DiningTable> {
        self.apply_table_event(table_id, TableEvent::AcknowledgeCall)
    }

    /// Plan `event` and write the outcome; closing transitions detach the session
    fn apply_table_event(&self, table_id: i64, event: TableEvent) -> ManagerResult<DiningTable> {
        let now = now_millis();
        let mut store = self.store.write();
        let mut ctx = store.table_context(table_id)?;

        let transition = plan(table_id, ctx.table.status, event, &ctx.summary()).inspect_err(|e| {
            tracing::warn!(table_id, event = %event, error = %e, "Table transition refused");
        })?;
        if transition.is_noop() {
            tracing::debug!(table_id, event = %event, status = %transition.from, "Table transition is a no-op");
            return Ok(ctx.table.clone());
        }

        match transition.closes_session {
            Some(reason) => {
                let detached = session::close(ctx.table, ctx.session, reason, now);
                tracing::info!(table_id, session_id = ?detached, reason = ?reason, "Session closed");
            }
            None => {
                ctx.table.status = transition.to;
                ctx.table.updated_at = now;
            }
        }

        tracing::info!(
            table_id,
            event = %event,
            from = %transition.from,
            to = %transition.to,
            "Table status changed"
        );
        Ok(ctx.table.clone())
    }
}

/// Edits are allowed only on the visit currently bound to the table
fn editable_status(
    table: &DiningTable,
    is_current: bool,
    order_item_id: i64,
) -> ManagerResult<TableStatus> {
    if is_current {
        Ok(table.status)
    } else {
        Err(PosError::EditLocked {
            order_item_id,
            reason: "visit already closed".to_string(),
        })
    }
}

#[cfg(test)]
mod tests;
