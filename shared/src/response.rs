//! Response payloads of the dine-in API
//!
//! Every mutation returns the post-transition table so a client can
//! re-synchronise without guessing.

use crate::error::ErrorCode;
use crate::models::{DiningTable, OrderItem, OrderItemStatus};
use crate::order::{BulkReport, CheckoutSnapshot};
use serde::{Deserialize, Serialize};

/// `issueSession`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssuedSession {
    pub session_id: String,
    /// URL encoded into the table's QR code
    pub qr_payload: String,
    pub table: DiningTable,
}

/// A submitted line that could not be built (sold out, bad option, ...)
///
/// Only that line is refused; the rest of the order goes through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RejectedLine {
    /// Position in the submitted `items`
    pub index: usize,
    pub item_id: i64,
    pub code: ErrorCode,
    pub reason: String,
}

/// `submitOrder`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitOrderResponse {
    pub accepted: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedLine>,
    pub table: DiningTable,
}

/// `itemTransition`, `changeQuantity`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemResponse {
    pub item_status: OrderItemStatus,
    pub item: OrderItem,
    pub table: DiningTable,
}

/// `removeItem`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemovedItem {
    pub removed: OrderItem,
    pub table: DiningTable,
}

/// `acceptAll` / `completeAll`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkResponse {
    #[serde(flatten)]
    pub report: BulkReport,
    pub table: DiningTable,
}

/// `checkout`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutResponse {
    pub snapshot: CheckoutSnapshot,
    pub table: DiningTable,
}

/// `purgeSession`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PurgedSession {
    pub session_id: String,
    pub removed_items: usize,
}

/// `markAllRead`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkedRead {
    pub updated: usize,
}

/// `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub tables: usize,
    pub active_sessions: usize,
}
