//! Order input/output types

use crate::error::ErrorCode;
use crate::models::{CustomerRequest, OrderItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// What the customer picked for one line, as sent to `submitOrder`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderSelection {
    pub item_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default)]
    pub option_value_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

fn default_quantity() -> i32 {
    1
}

/// Validated, priced line ready to append to a ledger
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItemDraft {
    pub item_id: i64,
    pub menu_name: String,
    pub quantity: i32,
    /// Base price plus every selected option delta
    pub unit_price: Decimal,
    pub customer_request: CustomerRequest,
    pub option_value_ids: Vec<i64>,
}

/// Per-item failure inside a bulk operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkFailure {
    pub order_item_id: i64,
    pub code: ErrorCode,
    pub reason: String,
}

/// Outcome of `acceptAll` / `completeAll`
///
/// Successes are never rolled back because of a failure elsewhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkReport {
    pub succeeded: Vec<OrderItem>,
    pub failed: Vec<BulkFailure>,
}

impl BulkReport {
    pub fn is_partial_failure(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}
