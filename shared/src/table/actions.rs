//! Which staff actions a table currently allows
//!
//! Derived only from table status and ledger counts; the cached checkout
//! snapshot is never consulted.

use super::machine::checkout_guard;
use crate::models::TableStatus;
use crate::order::LedgerSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableActions {
    pub can_checkout: bool,
    /// Why checkout is disabled while the visit is still ordering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_blocked_reason: Option<String>,
    pub can_confirm_payment: bool,
    /// Normal clear (no force) is legal
    pub can_clear: bool,
    /// Only a forced clear can release the table
    pub needs_force_clear: bool,
    pub can_print_receipt: bool,
    pub can_edit_items: bool,
    pub can_acknowledge_call: bool,
}

impl TableActions {
    pub fn derive(status: TableStatus, summary: &LedgerSummary) -> Self {
        let (can_checkout, checkout_blocked_reason) = if status.is_ordering() {
            match checkout_guard(summary) {
                Ok(()) => (true, None),
                Err(block) => (false, Some(block.to_string())),
            }
        } else {
            (false, None)
        };

        Self {
            can_checkout,
            checkout_blocked_reason,
            can_confirm_payment: status == TableStatus::WaitingPayment,
            can_clear: status.is_clearable(),
            needs_force_clear: status.is_ordering() || status == TableStatus::WaitingPayment,
            can_print_receipt: status.is_receipt_ready(),
            can_edit_items: status.is_ordering(),
            can_acknowledge_call: matches!(status, TableStatus::Calling | TableStatus::NeedsCheckout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_checkout_has_reason() {
        let summary = LedgerSummary {
            pending: 1,
            ..Default::default()
        };
        let actions = TableActions::derive(TableStatus::Occupied, &summary);
        assert!(!actions.can_checkout);
        assert_eq!(
            actions.checkout_blocked_reason.as_deref(),
            Some("1 items still pending in the kitchen")
        );
        assert!(actions.needs_force_clear);
        assert!(!actions.can_clear);
        assert!(actions.can_edit_items);
    }

    #[test]
    fn test_receipt_gate_follows_status() {
        let summary = LedgerSummary {
            completed: 2,
            ..Default::default()
        };
        for status in TableStatus::ALL {
            let actions = TableActions::derive(status, &summary);
            assert_eq!(actions.can_print_receipt, status.is_receipt_ready(), "{status}");
        }
        let actions = TableActions::derive(TableStatus::NeedsClearing, &summary);
        assert!(actions.can_clear);
        assert!(!actions.needs_force_clear);
        assert!(!actions.can_checkout);
    }

    #[test]
    fn test_available_table_allows_nothing() {
        let actions = TableActions::derive(TableStatus::Available, &LedgerSummary::default());
        assert_eq!(actions, TableActions::default());
    }
}
