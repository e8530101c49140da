//! LocalView - 客户端本地投影
//!
//! Read-through/write-through copy of the slice of server state a panel
//! shows. It is only changed through `apply_*` (results of this client's own
//! calls) and `refresh_*` (polling reconciliation). Nothing here guesses a
//! post-mutation state; callers re-fetch the table after every mutation.

use shared::models::{DiningTable, Notification, OrderItem, OrderItemStatus};
use shared::order::{LedgerSummary, SessionOrders};
use shared::table::TableActions;
use shared::util::now_millis;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Remembered notification ids (oldest forgotten first)
const SEEN_CAPACITY: usize = 2048;

#[derive(Debug, Default)]
pub struct LocalView {
    tables: BTreeMap<i64, DiningTable>,
    /// session_id -> orders
    orders: HashMap<String, SessionOrders>,
    seen_notifications: BTreeSet<i64>,
    last_refreshed_at: Option<i64>,
    /// Tables whose last mutation had an uncertain outcome
    stale: HashSet<i64>,
}

impl LocalView {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Queries ==========

    pub fn table(&self, table_id: i64) -> Option<&DiningTable> {
        self.tables.get(&table_id)
    }

    pub fn tables(&self) -> impl Iterator<Item = &DiningTable> {
        self.tables.values()
    }

    pub fn orders(&self, session_id: &str) -> Option<&SessionOrders> {
        self.orders.get(session_id)
    }

    /// Orders of the session currently bound to `table_id`
    pub fn table_orders(&self, table_id: i64) -> Option<&SessionOrders> {
        let session_id = self.table(table_id)?.session_id.as_deref()?;
        self.orders(session_id)
    }

    pub fn item(&self, order_item_id: i64) -> Option<&OrderItem> {
        self.orders
            .values()
            .flat_map(|o| o.orders.iter())
            .find(|i| i.order_item_id == order_item_id)
    }

    /// Items still waiting for the kitchen, oldest first
    pub fn pending_items(&self) -> Vec<&OrderItem> {
        let mut items: Vec<&OrderItem> = self
            .orders
            .values()
            .flat_map(|o| o.orders.iter())
            .filter(|i| i.status == OrderItemStatus::Pending)
            .collect();
        items.sort_by_key(|i| (i.created_at, i.order_item_id));
        items
    }

    /// Actions derived from the cached table and ledger
    ///
    /// Only meaningful right after the table has been re-fetched.
    pub fn actions(&self, table_id: i64) -> Option<TableActions> {
        let table = self.table(table_id)?;
        let summary = self
            .table_orders(table_id)
            .map(|o| LedgerSummary::from_items(&o.orders))
            .unwrap_or_default();
        Some(TableActions::derive(table.status, &summary))
    }

    pub fn last_refreshed_at(&self) -> Option<i64> {
        self.last_refreshed_at
    }

    pub fn is_stale(&self, table_id: i64) -> bool {
        self.stale.contains(&table_id)
    }

    pub fn has_seen(&self, notification_id: i64) -> bool {
        self.seen_notifications.contains(&notification_id)
    }

    /// Largest notification id seen so far, for `since_id` polling
    pub fn last_notification_id(&self) -> Option<i64> {
        self.seen_notifications.last().copied()
    }

    // ========== apply_* ==========

    /// Store an authoritative table; returns the previous copy
    pub fn apply_table(&mut self, table: DiningTable) -> Option<DiningTable> {
        let table_id = table.table_id;
        self.stale.remove(&table_id);
        let previous = self.tables.insert(table_id, table);
        if let Some(prev) = &previous {
            self.forget_detached(prev);
        }
        previous
    }

    pub fn apply_orders(&mut self, orders: SessionOrders) {
        self.orders.insert(orders.session_id.clone(), orders);
    }

    /// Replace one item inside its cached session, recomputing totals
    pub fn apply_item(&mut self, item: OrderItem) {
        let Some(cached) = self.orders.get_mut(&item.session_id) else {
            return;
        };
        let mut items = std::mem::take(&mut cached.orders);
        match items.iter_mut().find(|i| i.order_item_id == item.order_item_id) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        *cached = SessionOrders::compute(cached.table_id, &cached.session_id, &items);
    }

    pub fn apply_removed(&mut self, item: &OrderItem) {
        let Some(cached) = self.orders.get_mut(&item.session_id) else {
            return;
        };
        let items: Vec<OrderItem> = cached
            .orders
            .iter()
            .filter(|i| i.order_item_id != item.order_item_id)
            .cloned()
            .collect();
        *cached = SessionOrders::compute(cached.table_id, &cached.session_id, &items);
    }

    /// Record notifications; returns only those not seen before (at-least-once → exactly-once)
    pub fn apply_notifications(&mut self, notifications: Vec<Notification>) -> Vec<Notification> {
        let fresh: Vec<Notification> = notifications
            .into_iter()
            .filter(|n| self.seen_notifications.insert(n.notification_id))
            .collect();
        while self.seen_notifications.len() > SEEN_CAPACITY {
            self.seen_notifications.pop_first();
        }
        fresh
    }

    pub fn mark_stale(&mut self, table_id: i64) {
        self.stale.insert(table_id);
    }

    // ========== refresh_* ==========

    /// Full reconciliation: the server list replaces the local one
    pub fn refresh_tables(&mut self, tables: Vec<DiningTable>) {
        self.tables = tables.into_iter().map(|t| (t.table_id, t)).collect();
        self.stale.clear();
        let bound: HashSet<&str> = self
            .tables
            .values()
            .filter_map(|t| t.session_id.as_deref())
            .collect();
        self.orders.retain(|sid, _| bound.contains(sid.as_str()));
        self.last_refreshed_at = Some(now_millis());
    }

    /// Drop cached orders of a session the table no longer carries
    fn forget_detached(&mut self, previous: &DiningTable) {
        let Some(old_sid) = previous.session_id.as_deref() else {
            return;
        };
        let still_bound = self
            .tables
            .get(&previous.table_id)
            .is_some_and(|t| t.session_id.as_deref() == Some(old_sid));
        if !still_bound {
            self.orders.remove(old_sid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::{CustomerRequest, NotificationType, TableStatus};

    fn table(id: i64, status: TableStatus, sid: Option<&str>) -> DiningTable {
        DiningTable {
            table_id: id,
            name: format!("T{id}"),
            status,
            session_id: sid.map(str::to_string),
            checkout_at: None,
            updated_at: 0,
        }
    }

    fn item(id: i64, sid: &str, status: OrderItemStatus) -> OrderItem {
        OrderItem {
            order_item_id: id,
            session_id: sid.into(),
            table_id: 1,
            item_id: 302,
            menu_name: "น้ำเปล่า".into(),
            quantity: 1,
            unit_price: Decimal::new(15, 0),
            customer_request: CustomerRequest::default(),
            status,
            created_at: id,
            updated_at: id,
        }
    }

    fn notification(id: i64) -> Notification {
        Notification {
            notification_id: id,
            table_id: 1,
            kind: NotificationType::NewOrder,
            message: String::new(),
            created_at: id,
            read: false,
        }
    }

    #[test]
    fn test_notifications_deduplicate_by_id() {
        let mut view = LocalView::new();
        let fresh = view.apply_notifications(vec![notification(1), notification(2)]);
        assert_eq!(fresh.len(), 2);

        // 重复投递
        let fresh = view.apply_notifications(vec![notification(2), notification(3)]);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].notification_id, 3);
        assert_eq!(view.last_notification_id(), Some(3));
    }

    #[test]
    fn test_apply_item_recomputes_total() {
        let mut view = LocalView::new();
        view.apply_table(table(1, TableStatus::Occupied, Some("s1")));
        let items = vec![
            item(1, "s1", OrderItemStatus::Pending),
            item(2, "s1", OrderItemStatus::Pending),
        ];
        view.apply_orders(SessionOrders::compute(1, "s1", &items));
        assert_eq!(view.pending_items().len(), 2);

        view.apply_item(item(2, "s1", OrderItemStatus::Rejected));
        let orders = view.table_orders(1).unwrap();
        assert_eq!(orders.total_amount, Decimal::new(15, 0));
        assert_eq!(orders.order_count, 2);
        assert_eq!(view.pending_items().len(), 1);

        view.apply_removed(&item(1, "s1", OrderItemStatus::Pending));
        assert_eq!(view.table_orders(1).unwrap().order_count, 1);
    }

    #[test]
    fn test_detached_session_orders_are_dropped() {
        let mut view = LocalView::new();
        view.apply_table(table(1, TableStatus::NeedsClearing, Some("s1")));
        view.apply_orders(SessionOrders::compute(1, "s1", &[]));

        view.apply_table(table(1, TableStatus::Available, None));
        assert!(view.orders("s1").is_none());
        assert!(view.table_orders(1).is_none());
    }

    #[test]
    fn test_refresh_clears_stale_and_orphans() {
        let mut view = LocalView::new();
        view.apply_table(table(1, TableStatus::WaitingPayment, Some("s1")));
        view.apply_orders(SessionOrders::compute(1, "s1", &[]));
        view.mark_stale(1);
        assert!(view.is_stale(1));
        assert!(view.last_refreshed_at().is_none());

        view.refresh_tables(vec![table(1, TableStatus::Available, None), table(2, TableStatus::Available, None)]);
        assert!(!view.is_stale(1));
        assert!(view.orders("s1").is_none());
        assert_eq!(view.tables().count(), 2);
        assert!(view.last_refreshed_at().is_some());
    }

    #[test]
    fn test_actions_follow_cached_ledger() {
        let mut view = LocalView::new();
        view.apply_table(table(1, TableStatus::Occupied, Some("s1")));
        view.apply_orders(SessionOrders::compute(1, "s1", &[item(1, "s1", OrderItemStatus::Pending)]));

        let actions = view.actions(1).unwrap();
        assert!(!actions.can_checkout);
        assert!(actions.checkout_blocked_reason.is_some());

        view.apply_item(item(1, "s1", OrderItemStatus::Completed));
        assert!(view.actions(1).unwrap().can_checkout);
        assert!(view.actions(9).is_none());
    }
}
