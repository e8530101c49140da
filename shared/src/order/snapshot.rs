//! Checkout snapshot and session order views
//!
//! Both are pure functions of the item set (plus the recorded checkout
//! timestamp), so a receipt rebuilt later matches the one produced at
//! checkout time.

use super::billing::{ReceiptLine, group_for_receipt, session_total, sorted_items};
use crate::models::OrderItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Frozen bill consumed by receipt rendering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutSnapshot {
    pub table_id: i64,
    pub session_id: String,
    /// Every item of the session, rejected ones included (display order)
    pub orders: Vec<OrderItem>,
    /// Grouped receipt rows
    pub lines: Vec<ReceiptLine>,
    pub total_amount: Decimal,
    pub session_created_at: i64,
    pub checkout_at: i64,
}

impl CheckoutSnapshot {
    pub fn compute(
        table_id: i64,
        session_id: &str,
        session_created_at: i64,
        items: &[OrderItem],
        checkout_at: i64,
    ) -> Self {
        Self {
            table_id,
            session_id: session_id.to_string(),
            orders: sorted_items(items).into_iter().cloned().collect(),
            lines: group_for_receipt(items),
            total_amount: session_total(items),
            session_created_at,
            checkout_at,
        }
    }
}

/// `sessionOrders` view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionOrders {
    pub table_id: i64,
    pub session_id: String,
    pub total_amount: Decimal,
    /// Number of order lines (not summed quantity)
    pub order_count: usize,
    pub orders: Vec<OrderItem>,
}

impl SessionOrders {
    pub fn compute(table_id: i64, session_id: &str, items: &[OrderItem]) -> Self {
        Self {
            table_id,
            session_id: session_id.to_string(),
            total_amount: session_total(items),
            order_count: items.len(),
            orders: sorted_items(items).into_iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomerRequest, OrderItemStatus};

    fn item(id: i64, created_at: i64, status: OrderItemStatus) -> OrderItem {
        OrderItem {
            order_item_id: id,
            session_id: "s-9".into(),
            table_id: 9,
            item_id: 1,
            menu_name: "ชาไทย".into(),
            quantity: 1,
            unit_price: Decimal::new(35, 0),
            customer_request: CustomerRequest::default(),
            status,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_snapshot_is_reproducible() {
        let items = vec![
            item(2, 20, OrderItemStatus::Completed),
            item(1, 10, OrderItemStatus::Rejected),
            item(3, 20, OrderItemStatus::Completed),
        ];
        let at_checkout = CheckoutSnapshot::compute(9, "s-9", 5, &items, 100);

        let mut shuffled = items.clone();
        shuffled.rotate_left(1);
        let rebuilt = CheckoutSnapshot::compute(9, "s-9", 5, &shuffled, 100);

        assert_eq!(at_checkout, rebuilt);
        assert_eq!(
            serde_json::to_string(&at_checkout).unwrap(),
            serde_json::to_string(&rebuilt).unwrap()
        );
        assert_eq!(at_checkout.total_amount, Decimal::new(70, 0));
        let ids: Vec<i64> = at_checkout.orders.iter().map(|o| o.order_item_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_session_orders_counts_lines() {
        let mut a = item(1, 1, OrderItemStatus::Pending);
        a.quantity = 4;
        let view = SessionOrders::compute(9, "s-9", &[a, item(2, 2, OrderItemStatus::Rejected)]);
        assert_eq!(view.order_count, 2);
        assert_eq!(view.total_amount, Decimal::new(140, 0));
    }
}
