//! Billing Engine
//!
//! Pure money derivations over ledger items. Rejected items keep their
//! `unit_price` for display but contribute 0 to every total.
//!
//! All derived amounts are rounded to 2 decimal places (half away from
//! zero) and computed over items in `(created_at, order_item_id)` order, so
//! repeated computation over the same items is bit-identical.

use crate::models::{OrderItem, OrderItemStatus};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// `unit_price * quantity`, or 0 for a rejected item
pub fn line_total(item: &OrderItem) -> Decimal {
    if !item.status.is_billable() {
        return Decimal::ZERO;
    }
    round_money(item.unit_price * Decimal::from(item.quantity))
}

/// Σ line_total over the session's items
pub fn session_total<'a>(items: impl IntoIterator<Item = &'a OrderItem>) -> Decimal {
    round_money(items.into_iter().map(line_total).sum())
}

/// Stable display order for items
pub fn sorted_items<'a>(items: impl IntoIterator<Item = &'a OrderItem>) -> Vec<&'a OrderItem> {
    let mut sorted: Vec<&OrderItem> = items.into_iter().collect();
    sorted.sort_by_key(|i| (i.created_at, i.order_item_id));
    sorted
}

/// One grouped receipt row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceiptLine {
    pub menu_name: String,
    pub status: OrderItemStatus,
    /// Addon/note segment of the customer request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addon: Option<String>,
    pub quantity: i32,
    /// Price shown on the receipt (taken from the earliest item in the group)
    pub unit_price: Decimal,
    /// Price actually charged per unit (0 when rejected)
    pub effective_unit_price: Decimal,
    pub line_total: Decimal,
    /// Render `unit_price` struck through
    pub struck_through: bool,
    pub order_item_ids: Vec<i64>,
}

/// Group items by `(menu_name, status, addon segment)`
///
/// Groups appear in the order of their earliest item.
pub fn group_for_receipt<'a>(items: impl IntoIterator<Item = &'a OrderItem>) -> Vec<ReceiptLine> {
    let mut lines: Vec<ReceiptLine> = Vec::new();
    for item in sorted_items(items) {
        let addon = item.customer_request.addon_segment();
        let existing = lines.iter_mut().find(|l| {
            l.menu_name == item.menu_name && l.status == item.status && l.addon.as_deref() == addon
        });
        match existing {
            Some(line) => {
                line.quantity += item.quantity;
                line.line_total = round_money(line.line_total + line_total(item));
                line.order_item_ids.push(item.order_item_id);
            }
            None => {
                let billable = item.status.is_billable();
                lines.push(ReceiptLine {
                    menu_name: item.menu_name.clone(),
                    status: item.status,
                    addon: addon.map(str::to_string),
                    quantity: item.quantity,
                    unit_price: round_money(item.unit_price),
                    effective_unit_price: if billable {
                        round_money(item.unit_price)
                    } else {
                        Decimal::ZERO
                    },
                    line_total: line_total(item),
                    struck_through: !billable,
                    order_item_ids: vec![item.order_item_id],
                });
            }
        }
    }
    lines
}
