//! In-memory backend for client tests
//!
//! Runs the same `shared` state machines the server uses, with hooks to
//! slow down checkout, re-deliver notifications and count calls.

#![allow(dead_code)]

use async_trait::async_trait;
use dinein_client::{ClientConfig, ClientResult, PosBackend};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::PosError;
use shared::error::Resource;
use shared::models::{
    Catalog, Category, DiningTable, MenuItem, Notification, NotificationType, OptionType,
    OptionValue, OrderItemStatus, SelectionMode, SessionInvalidReason, SessionValidation,
    TableSession, TableStatus,
};
use shared::order::{
    BulkFailure, BulkReport, CheckoutSnapshot, ItemAction, Ledger, OrderBuilder, OrderSelection,
    SessionOrders,
};
use shared::request::NotificationQuery;
use shared::response::{
    BulkResponse, CheckoutResponse, IssuedSession, ItemResponse, MarkedRead, RejectedLine,
    RemovedItem, SubmitOrderResponse,
};
use shared::table::{CallKind, TableActions, TableEvent, plan, session};
use shared::util::now_millis;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

pub const WATER: i64 = 302;
pub const FRIED_RICE: i64 = 101;
pub const SOLD_OUT: i64 = 303;

#[derive(Default)]
struct FakeState {
    tables: BTreeMap<i64, DiningTable>,
    sessions: HashMap<String, TableSession>,
    ledgers: HashMap<String, Ledger>,
    notifications: Vec<Notification>,
    next_notification_id: i64,
}

impl FakeState {
    fn table(&self, table_id: i64) -> Result<&DiningTable, PosError> {
        self.tables
            .get(&table_id)
            .ok_or_else(|| PosError::not_found(Resource::Table, table_id))
    }

    /// Session id whose ledger holds the item
    fn owner_of(&self, order_item_id: i64) -> Result<String, PosError> {
        self.ledgers
            .iter()
            .find(|(_, l)| l.get(order_item_id).is_some())
            .map(|(sid, _)| sid.clone())
            .ok_or_else(|| PosError::not_found(Resource::OrderItem, order_item_id))
    }

    fn invalid_reason(&self, session_id: &str) -> SessionInvalidReason {
        self.sessions
            .get(session_id)
            .and_then(|s| s.close_reason)
            .map(Into::into)
            .unwrap_or(SessionInvalidReason::Superseded)
    }

    fn push(&mut self, table_id: i64, kind: NotificationType, message: String) {
        self.next_notification_id += 1;
        self.notifications.push(Notification {
            notification_id: self.next_notification_id,
            table_id,
            kind,
            message,
            created_at: now_millis(),
            read: false,
        });
    }

    fn apply_event(&mut self, table_id: i64, event: TableEvent) -> Result<DiningTable, PosError> {
        let now = now_millis();
        let FakeState {
            tables,
            sessions,
            ledgers,
            ..
        } = self;
        let table = tables
            .get_mut(&table_id)
            .ok_or_else(|| PosError::not_found(Resource::Table, table_id))?;
        let summary = table
            .session_id
            .as_ref()
            .and_then(|sid| ledgers.get(sid))
            .map(Ledger::summary)
            .unwrap_or_default();

        let transition = plan(table_id, table.status, event, &summary)?;
        if transition.is_noop() {
            return Ok(table.clone());
        }
        match transition.closes_session {
            Some(reason) => {
                let record = table.session_id.as_ref().and_then(|sid| sessions.get_mut(sid));
                session::close(table, record, reason, now);
            }
            None => {
                table.status = transition.to;
                table.updated_at = now;
            }
        }
        Ok(table.clone())
    }
}

pub struct FakeBackend {
    state: Mutex<FakeState>,
    catalog: Mutex<Catalog>,
    checkout_delay: Mutex<Option<Duration>>,
    /// Ignore `since_id` and re-deliver everything (at-least-once)
    redeliver: AtomicBool,
    pub table_fetches: AtomicUsize,
    pub checkout_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new(table_count: i64) -> Arc<Self> {
        let state = FakeState {
            tables: (1..=table_count)
                .map(|id| (id, DiningTable::new(id, format!("โต๊ะ {id}"))))
                .collect(),
            ..Default::default()
        };
        Arc::new(Self {
            state: Mutex::new(state),
            catalog: Mutex::new(test_catalog()),
            checkout_delay: Mutex::new(None),
            redeliver: AtomicBool::new(false),
            table_fetches: AtomicUsize::new(0),
            checkout_calls: AtomicUsize::new(0),
        })
    }

    /// Checkout is applied, but the reply arrives only after `delay`
    pub fn delay_checkout(&self, delay: Duration) {
        *self.checkout_delay.lock() = Some(delay);
    }

    pub fn redeliver_notifications(&self, on: bool) {
        self.redeliver.store(on, Ordering::SeqCst);
    }

    pub fn table_status(&self, table_id: i64) -> TableStatus {
        self.state.lock().tables[&table_id].status
    }

    pub fn table_fetch_count(&self) -> usize {
        self.table_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PosBackend for FakeBackend {
    async fn list_tables(&self) -> ClientResult<Vec<DiningTable>> {
        Ok(self.state.lock().tables.values().cloned().collect())
    }

    async fn table(&self, table_id: i64) -> ClientResult<DiningTable> {
        self.table_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().table(table_id)?.clone())
    }

    async fn actions(&self, table_id: i64) -> ClientResult<TableActions> {
        let state = self.state.lock();
        let table = state.table(table_id)?;
        let summary = table
            .session_id
            .as_ref()
            .and_then(|sid| state.ledgers.get(sid))
            .map(Ledger::summary)
            .unwrap_or_default();
        Ok(TableActions::derive(table.status, &summary))
    }

    async fn receipt(&self, table_id: i64) -> ClientResult<CheckoutSnapshot> {
        let state = self.state.lock();
        let table = state.table(table_id)?;
        if !table.status.is_receipt_ready() {
            return Err(PosError::ReceiptNotReady {
                table_id,
                status: table.status,
            }
            .into());
        }
        let sid = table.session_id.clone().unwrap_or_default();
        let record = &state.sessions[&sid];
        let ledger = &state.ledgers[&sid];
        Ok(CheckoutSnapshot::compute(
            table_id,
            &sid,
            record.created_at,
            ledger.items(),
            table.checkout_at.unwrap_or(record.created_at),
        ))
    }

    async fn issue_session(&self, table_id: i64) -> ClientResult<IssuedSession> {
        let mut state = self.state.lock();
        let now = now_millis();
        let table = state
            .tables
            .get_mut(&table_id)
            .ok_or_else(|| PosError::not_found(Resource::Table, table_id))?;
        let record = session::issue(table, now)?;
        let table = table.clone();
        let sid = record.session_id.clone();
        state.ledgers.insert(sid.clone(), Ledger::new(table_id, sid.clone()));
        state.sessions.insert(sid.clone(), record);
        Ok(IssuedSession {
            qr_payload: format!("http://localhost/order?table={table_id}&session={sid}"),
            session_id: sid,
            table,
        })
    }

    async fn validate_session(&self, table_id: i64, session_id: &str) -> ClientResult<SessionValidation> {
        let state = self.state.lock();
        let table = state.table(table_id)?;
        Ok(session::validate(table, session_id, state.sessions.get(session_id)))
    }

    async fn session_orders(&self, table_id: i64, session_id: &str) -> ClientResult<SessionOrders> {
        let state = self.state.lock();
        let ledger = state
            .ledgers
            .get(session_id)
            .filter(|l| l.table_id == table_id)
            .ok_or_else(|| PosError::not_found(Resource::Session, session_id))?;
        Ok(SessionOrders::compute(table_id, session_id, ledger.items()))
    }

    async fn submit_order(
        &self,
        session_id: &str,
        items: &[OrderSelection],
    ) -> ClientResult<SubmitOrderResponse> {
        let catalog = self.catalog.lock().clone();
        let mut state = self.state.lock();
        let now = now_millis();

        let table_id = state
            .sessions
            .get(session_id)
            .map(|s| s.table_id)
            .ok_or_else(|| PosError::not_found(Resource::Session, session_id))?;
        let table = state.table(table_id)?.clone();
        if !table.is_bound_to(session_id) {
            return Err(PosError::SessionInvalid(state.invalid_reason(session_id)).into());
        }
        let ledger = state
            .ledgers
            .get_mut(session_id)
            .ok_or_else(|| PosError::not_found(Resource::Session, session_id))?;
        plan(table_id, table.status, TableEvent::SubmitOrder, &ledger.summary())?;

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        let mut first_error = None;
        for (index, selection) in items.iter().enumerate() {
            match OrderBuilder::from_selection(&catalog, selection) {
                Ok(draft) => accepted.push(ledger.append(draft, now).clone()),
                Err(e) => {
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
        if accepted.is_empty() {
            return Err(first_error
                .unwrap_or_else(|| PosError::Validation("no items".into()))
                .into());
        }
        state.push(
            table_id,
            NotificationType::NewOrder,
            format!("{} new items", accepted.len()),
        );
        Ok(SubmitOrderResponse {
            accepted,
            rejected,
            table,
        })
    }

    async fn item_transition(&self, order_item_id: i64, action: ItemAction) -> ClientResult<ItemResponse> {
        let mut state = self.state.lock();
        let sid = state.owner_of(order_item_id)?;
        let reason = state.invalid_reason(&sid);
        let FakeState { tables, ledgers, .. } = &mut *state;
        let ledger = ledgers
            .get_mut(&sid)
            .ok_or_else(|| PosError::not_found(Resource::Session, &sid))?;
        let table = tables[&ledger.table_id].clone();
        if !table.is_bound_to(&sid) {
            return Err(PosError::SessionInvalid(reason).into());
        }
        let item = ledger.apply(order_item_id, action, now_millis())?.clone();
        Ok(ItemResponse {
            item_status: item.status,
            item,
            table,
        })
    }

    async fn change_quantity(&self, order_item_id: i64, quantity: i32) -> ClientResult<ItemResponse> {
        let mut state = self.state.lock();
        let sid = state.owner_of(order_item_id)?;
        let FakeState { tables, ledgers, .. } = &mut *state;
        let ledger = ledgers
            .get_mut(&sid)
            .ok_or_else(|| PosError::not_found(Resource::Session, &sid))?;
        let table = tables[&ledger.table_id].clone();
        let status = if table.is_bound_to(&sid) {
            table.status
        } else {
            TableStatus::Available
        };
        let item = ledger
            .change_quantity(status, order_item_id, quantity, now_millis())?
            .clone();
        Ok(ItemResponse {
            item_status: item.status,
            item,
            table,
        })
    }

    async fn remove_item(&self, order_item_id: i64) -> ClientResult<RemovedItem> {
        let mut state = self.state.lock();
        let sid = state.owner_of(order_item_id)?;
        let FakeState { tables, ledgers, .. } = &mut *state;
        let ledger = ledgers
            .get_mut(&sid)
            .ok_or_else(|| PosError::not_found(Resource::Session, &sid))?;
        let table = tables[&ledger.table_id].clone();
        let status = if table.is_bound_to(&sid) {
            table.status
        } else {
            TableStatus::Available
        };
        let removed = ledger.remove(status, order_item_id)?;
        Ok(RemovedItem { removed, table })
    }

    async fn bulk(
        &self,
        table_id: i64,
        action: ItemAction,
        order_item_ids: Option<Vec<i64>>,
    ) -> ClientResult<BulkResponse> {
        let mut state = self.state.lock();
        let now = now_millis();
        let FakeState { tables, ledgers, .. } = &mut *state;
        let table = tables
            .get(&table_id)
            .ok_or_else(|| PosError::not_found(Resource::Table, table_id))?
            .clone();

        let ledger = table.session_id.as_ref().and_then(|sid| ledgers.get_mut(sid));
        let report = match (ledger, order_item_ids) {
            (Some(ledger), Some(ids)) => ledger.apply_each(&ids, action, now),
            (Some(ledger), None) => match action {
                ItemAction::Accept => ledger.accept_all(now),
                ItemAction::Complete => ledger.complete_all(now),
                ItemAction::Reject => {
                    let ids = ledger.ids_with_status(OrderItemStatus::Pending);
                    ledger.apply_each(&ids, action, now)
                }
            },
            (None, ids) => BulkReport {
                succeeded: Vec::new(),
                failed: ids
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
        Ok(BulkResponse { report, table })
    }

    async fn checkout(&self, table_id: i64, session_id: &str) -> ClientResult<CheckoutResponse> {
        self.checkout_calls.fetch_add(1, Ordering::SeqCst);
        let response = {
            let mut state = self.state.lock();
            let now = now_millis();
            let reason = state.invalid_reason(session_id);
            let FakeState {
                tables,
                sessions,
                ledgers,
                ..
            } = &mut *state;
            let table = tables
                .get_mut(&table_id)
                .ok_or_else(|| PosError::not_found(Resource::Table, table_id))?;
            if !table.is_bound_to(session_id) {
                return Err(PosError::SessionInvalid(reason).into());
            }
            let ledger = ledgers
                .get(session_id)
                .ok_or_else(|| PosError::not_found(Resource::Session, session_id))?;
            let transition = plan(table_id, table.status, TableEvent::RequestCheckout, &ledger.summary())?;
            table.status = transition.to;
            table.checkout_at = Some(now);
            table.updated_at = now;
            let record = sessions
                .get_mut(session_id)
                .ok_or_else(|| PosError::not_found(Resource::Session, session_id))?;
            record.checkout_at = Some(now);

            let snapshot =
                CheckoutSnapshot::compute(table_id, session_id, record.created_at, ledger.items(), now);
            let response = CheckoutResponse {
                snapshot,
                table: table.clone(),
            };
            state.push(table_id, NotificationType::CheckoutRequest, "checkout".into());
            response
        };

        let delay = *self.checkout_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(response)
    }

    async fn payment_complete(&self, table_id: i64) -> ClientResult<DiningTable> {
        Ok(self
            .state
            .lock()
            .apply_event(table_id, TableEvent::ConfirmPayment)?)
    }

    async fn clear_table(&self, table_id: i64, force: bool) -> ClientResult<DiningTable> {
        Ok(self
            .state
            .lock()
            .apply_event(table_id, TableEvent::Clear { force })?)
    }

    async fn call(&self, table_id: i64, kind: CallKind) -> ClientResult<DiningTable> {
        let mut state = self.state.lock();
        let table = state.apply_event(table_id, TableEvent::Call(kind))?;
        let notification = match kind {
            CallKind::Staff => NotificationType::CallStaff,
            CallKind::Bill => NotificationType::CallBill,
        };
        state.push(table_id, notification, String::new());
        Ok(table)
    }

    async fn acknowledge_call(&self, table_id: i64) -> ClientResult<DiningTable> {
        Ok(self
            .state
            .lock()
            .apply_event(table_id, TableEvent::AcknowledgeCall)?)
    }

    async fn catalog(&self) -> ClientResult<Catalog> {
        Ok(self.catalog.lock().clone())
    }

    async fn set_availability(&self, item_id: i64, available: bool) -> ClientResult<MenuItem> {
        let mut catalog = self.catalog.lock();
        let item = catalog
            .item_mut(item_id)
            .ok_or_else(|| PosError::not_found(Resource::MenuItem, item_id))?;
        item.is_available = available;
        Ok(item.clone())
    }

    async fn notifications(&self, query: NotificationQuery) -> ClientResult<Vec<Notification>> {
        let since_id = if self.redeliver.load(Ordering::SeqCst) {
            None
        } else {
            query.since_id
        };
        Ok(self
            .state
            .lock()
            .notifications
            .iter()
            .filter(|n| since_id.is_none_or(|since| n.notification_id > since))
            .filter(|n| !query.unread_only || !n.read)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, notification_id: i64) -> ClientResult<Notification> {
        let mut state = self.state.lock();
        let notification = state
            .notifications
            .iter_mut()
            .find(|n| n.notification_id == notification_id)
            .ok_or_else(|| PosError::not_found(Resource::Notification, notification_id))?;
        notification.read = true;
        Ok(notification.clone())
    }

    async fn mark_all_read(&self) -> ClientResult<MarkedRead> {
        let mut state = self.state.lock();
        let mut updated = 0;
        for n in state.notifications.iter_mut().filter(|n| !n.read) {
            n.read = true;
            updated += 1;
        }
        Ok(MarkedRead { updated })
    }
}

pub fn test_config() -> ClientConfig {
    ClientConfig::new("http://fake")
}

pub fn water(quantity: i32) -> OrderSelection {
    OrderSelection {
        item_id: WATER,
        quantity,
        option_value_ids: Vec::new(),
        note: None,
    }
}

pub fn selection(item_id: i64) -> OrderSelection {
    OrderSelection {
        item_id,
        quantity: 1,
        option_value_ids: Vec::new(),
        note: None,
    }
}

pub fn money(value: i64) -> Decimal {
    Decimal::new(value, 0)
}

fn test_catalog() -> Catalog {
    let item = |item_id: i64, name: &str, price: i64, available: bool, options: Vec<i64>| MenuItem {
        item_id,
        category_id: 1,
        name: name.to_string(),
        base_price: money(price),
        is_available: available,
        option_type_ids: options,
    };
    let value = |value_id: i64, name: &str, is_default: bool| OptionValue {
        value_id,
        name: name.to_string(),
        additional_price: Decimal::ZERO,
        is_default,
        is_active: true,
    };
    Catalog {
        categories: vec![Category {
            category_id: 1,
            name: "เมนู".into(),
            display_order: 0,
        }],
        items: vec![
            item(FRIED_RICE, "ข้าวผัด", 60, true, vec![1]),
            item(WATER, "น้ำเปล่า", 15, true, vec![]),
            item(SOLD_OUT, "ชาเย็น", 25, false, vec![]),
        ],
        option_types: vec![OptionType {
            option_type_id: 1,
            name: "ความเผ็ด".into(),
            mode: SelectionMode::Single,
            required: true,
            values: vec![value(11, "ไม่เผ็ด", false), value(12, "เผ็ดน้อย", true)],
        }],
    }
}
