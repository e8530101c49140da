//! Request bodies and query strings of the dine-in API

use crate::order::OrderSelection;
use crate::table::CallKind;
use serde::{Deserialize, Serialize};

/// `POST /api/sessions/{session_id}/orders`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitOrderRequest {
    pub items: Vec<OrderSelection>,
}

/// `POST /api/tables/{table_id}/checkout`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub session_id: String,
}

/// `POST /api/tables/{table_id}/clear`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClearTableRequest {
    #[serde(default)]
    pub force: bool,
}

/// `POST /api/tables/{table_id}/call`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallRequest {
    pub kind: CallKind,
}

/// `PATCH /api/items/{order_item_id}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeQuantityRequest {
    pub quantity: i32,
}

/// `POST /api/tables/{table_id}/items/{accept-all|complete-all}`
///
/// Without ids every eligible item of the active session is targeted.
/// With ids (the caller's possibly stale view) each listed item is tried.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkItemsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_item_ids: Option<Vec<i64>>,
}

/// `PUT /api/catalog/items/{item_id}/availability`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvailabilityRequest {
    pub available: bool,
}

/// `GET /api/notifications`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationQuery {
    /// Only notifications with a larger id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since_id: Option<i64>,
    #[serde(default)]
    pub unread_only: bool,
}
