//! Order/Item Ledger
//!
//! Per-session list of order items. Item status moves only along
//! `pending → accepted → completed` or `pending → rejected`; every other
//! edge is an [`PosError::InvalidItemTransition`].

use super::types::{BulkFailure, BulkReport, LineItemDraft, MAX_QUANTITY};
use crate::error::{PosError, PosResult, Resource};
use crate::models::{OrderItem, OrderItemStatus, TableStatus};
use crate::util::snowflake_id;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Staff action on a single order item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemAction {
    Accept,
    Reject,
    Complete,
}

impl ItemAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            ItemAction::Accept => "accept",
            ItemAction::Reject => "reject",
            ItemAction::Complete => "complete",
        }
    }

    /// Target status when legal from `from`
    pub const fn target(self, from: OrderItemStatus) -> Option<OrderItemStatus> {
        match (self, from) {
            (ItemAction::Accept, OrderItemStatus::Pending) => Some(OrderItemStatus::Accepted),
            (ItemAction::Reject, OrderItemStatus::Pending) => Some(OrderItemStatus::Rejected),
            (ItemAction::Complete, OrderItemStatus::Accepted) => Some(OrderItemStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for ItemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemAction {
    type Err = PosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(ItemAction::Accept),
            "reject" => Ok(ItemAction::Reject),
            "complete" => Ok(ItemAction::Complete),
            other => Err(PosError::Validation(format!("unknown item action: {other}"))),
        }
    }
}

/// Apply one staff action to one item
pub fn transition(item: &mut OrderItem, action: ItemAction, now: i64) -> PosResult<OrderItemStatus> {
    let next = action
        .target(item.status)
        .ok_or(PosError::InvalidItemTransition {
            order_item_id: item.order_item_id,
            from: item.status,
            action,
        })?;
    item.status = next;
    item.updated_at = now;
    Ok(next)
}

/// Item counts by status, consumed by the checkout guard
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerSummary {
    pub pending: usize,
    pub accepted: usize,
    pub completed: usize,
    pub rejected: usize,
}

impl LedgerSummary {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a OrderItem>) -> Self {
        items
            .into_iter()
            .fold(LedgerSummary::default(), |mut acc, item| {
                match item.status {
                    OrderItemStatus::Pending => acc.pending += 1,
                    OrderItemStatus::Accepted => acc.accepted += 1,
                    OrderItemStatus::Completed => acc.completed += 1,
                    OrderItemStatus::Rejected => acc.rejected += 1,
                }
                acc
            })
    }

    /// Items that still count toward the bill
    pub fn billable(&self) -> usize {
        self.pending + self.accepted + self.completed
    }

    pub fn total(&self) -> usize {
        self.billable() + self.rejected
    }

    /// Kitchen can still change the bill
    pub fn has_unresolved(&self) -> bool {
        self.pending + self.accepted > 0
    }
}

/// Items of one session, in insertion order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ledger {
    pub table_id: i64,
    pub session_id: String,
    items: Vec<OrderItem>,
}

impl Ledger {
    pub fn new(table_id: i64, session_id: impl Into<String>) -> Self {
        Self {
            table_id,
            session_id: session_id.into(),
            items: Vec::new(),
        }
    }

    pub fn from_items(table_id: i64, session_id: impl Into<String>, items: Vec<OrderItem>) -> Self {
        Self {
            table_id,
            session_id: session_id.into(),
            items,
        }
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<OrderItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, order_item_id: i64) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.order_item_id == order_item_id)
    }

    fn get_mut(&mut self, order_item_id: i64) -> PosResult<&mut OrderItem> {
        self.items
            .iter_mut()
            .find(|i| i.order_item_id == order_item_id)
            .ok_or_else(|| PosError::not_found(Resource::OrderItem, order_item_id))
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary::from_items(&self.items)
    }

    /// Append a priced draft as a new pending item
    pub fn append(&mut self, draft: LineItemDraft, now: i64) -> &OrderItem {
        let item = OrderItem {
            order_item_id: snowflake_id(),
            session_id: self.session_id.clone(),
            table_id: self.table_id,
            item_id: draft.item_id,
            menu_name: draft.menu_name,
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            customer_request: draft.customer_request,
            status: OrderItemStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.items.push(item);
        &self.items[self.items.len() - 1]
    }

    pub fn apply(&mut self, order_item_id: i64, action: ItemAction, now: i64) -> PosResult<&OrderItem> {
        let item = self.get_mut(order_item_id)?;
        transition(item, action, now)?;
        Ok(item)
    }

    /// Apply `action` to each listed item in order; failures do not stop the rest
    pub fn apply_each(&mut self, order_item_ids: &[i64], action: ItemAction, now: i64) -> BulkReport {
        let mut report = BulkReport::default();
        for &id in order_item_ids {
            match self.apply(id, action, now) {
                Ok(item) => report.succeeded.push(item.clone()),
                Err(e) => report.failed.push(BulkFailure {
                    order_item_id: id,
                    code: e.code(),
                    reason: e.to_string(),
                }),
            }
        }
        report
    }

    pub fn ids_with_status(&self, status: OrderItemStatus) -> Vec<i64> {
        self.items
            .iter()
            .filter(|i| i.status == status)
            .map(|i| i.order_item_id)
            .collect()
    }

    pub fn accept_all(&mut self, now: i64) -> BulkReport {
        let ids = self.ids_with_status(OrderItemStatus::Pending);
        self.apply_each(&ids, ItemAction::Accept, now)
    }

    pub fn complete_all(&mut self, now: i64) -> BulkReport {
        let ids = self.ids_with_status(OrderItemStatus::Accepted);
        self.apply_each(&ids, ItemAction::Complete, now)
    }

    /// Check an edit is allowed: table still ordering, item still pending
    fn editable(&mut self, table_status: TableStatus, order_item_id: i64) -> PosResult<&mut OrderItem> {
        let item = self.get_mut(order_item_id)?;
        if !table_status.is_ordering() {
            return Err(PosError::EditLocked {
                order_item_id,
                reason: format!("checkout already initiated (table is {table_status})"),
            });
        }
        if item.status != OrderItemStatus::Pending {
            return Err(PosError::EditLocked {
                order_item_id,
                reason: format!("item already {}", item.status),
            });
        }
        Ok(item)
    }

    pub fn change_quantity(
        &mut self,
        table_status: TableStatus,
        order_item_id: i64,
        quantity: i32,
        now: i64,
    ) -> PosResult<&OrderItem> {
        validate_quantity(quantity)?;
        let item = self.editable(table_status, order_item_id)?;
        item.quantity = quantity;
        item.updated_at = now;
        Ok(item)
    }

    pub fn remove(&mut self, table_status: TableStatus, order_item_id: i64) -> PosResult<OrderItem> {
        self.editable(table_status, order_item_id)?;
        let index = self
            .items
            .iter()
            .position(|i| i.order_item_id == order_item_id)
            .ok_or_else(|| PosError::not_found(Resource::OrderItem, order_item_id))?;
        Ok(self.items.remove(index))
    }
}

pub fn validate_quantity(quantity: i32) -> PosResult<()> {
    if quantity < 1 {
        return Err(PosError::InvalidQuantity(quantity));
    }
    if quantity > MAX_QUANTITY {
        return Err(PosError::QuantityOutOfRange {
            quantity,
            max: MAX_QUANTITY,
        });
    }
    Ok(())
}
