//! Dining Table Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// 桌台状态
///
/// `Checkout` is a legacy state: nothing transitions into it any more, but
/// tables persisted in that state must still be clearable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    NeedsCheckout,
    WaitingPayment,
    NeedsClearing,
    Calling,
    Checkout,
}

impl TableStatus {
    pub const ALL: [TableStatus; 7] = [
        TableStatus::Available,
        TableStatus::Occupied,
        TableStatus::NeedsCheckout,
        TableStatus::WaitingPayment,
        TableStatus::NeedsClearing,
        TableStatus::Calling,
        TableStatus::Checkout,
    ];

    /// Every status except `Available` carries a session
    pub const fn has_session(self) -> bool {
        !matches!(self, TableStatus::Available)
    }

    /// Customer is still ordering: items may be added, edited and handled by the kitchen.
    ///
    /// `Calling` and `NeedsCheckout` are advisory signals layered on top of `Occupied`.
    pub const fn is_ordering(self) -> bool {
        matches!(
            self,
            TableStatus::Occupied | TableStatus::Calling | TableStatus::NeedsCheckout
        )
    }

    /// Checkout has happened, so a receipt exists
    pub const fn is_receipt_ready(self) -> bool {
        matches!(
            self,
            TableStatus::WaitingPayment | TableStatus::NeedsClearing | TableStatus::Checkout
        )
    }

    /// Clearing from here is the normal path (no override needed)
    pub const fn is_clearable(self) -> bool {
        matches!(self, TableStatus::NeedsClearing | TableStatus::Checkout)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::NeedsCheckout => "needs_checkout",
            TableStatus::WaitingPayment => "waiting_payment",
            TableStatus::NeedsClearing => "needs_clearing",
            TableStatus::Calling => "calling",
            TableStatus::Checkout => "checkout",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dining table entity (桌台)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiningTable {
    pub table_id: i64,
    pub name: String,
    pub status: TableStatus,
    /// Present exactly while `status != available`
    pub session_id: Option<String>,
    /// Recorded when checkout succeeds; receipts are rebuilt from it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_at: Option<i64>,
    pub updated_at: i64,
}

impl DiningTable {
    pub fn new(table_id: i64, name: impl Into<String>) -> Self {
        Self {
            table_id,
            name: name.into(),
            status: TableStatus::Available,
            session_id: None,
            checkout_at: None,
            updated_at: crate::util::now_millis(),
        }
    }

    /// `session_id` is non-null iff the status is in the occupied family
    pub fn is_consistent(&self) -> bool {
        self.status.has_session() == self.session_id.is_some()
    }

    /// Whether `session_id` is the session currently bound to this table
    pub fn is_bound_to(&self, session_id: &str) -> bool {
        self.status.has_session() && self.session_id.as_deref() == Some(session_id)
    }
}
