//! Notification Model
//!
//! Ephemeral cross-panel signals. Delivery is at-least-once: the same
//! notification may be observed more than once, and consumers de-duplicate
//! by `notification_id`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    NewOrder,
    CallStaff,
    CallBill,
    ItemRequest,
    CheckoutRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub notification_id: i64,
    pub table_id: i64,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub message: String,
    pub created_at: i64,
    #[serde(default)]
    pub read: bool,
}
