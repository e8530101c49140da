//! Order Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the primary-attribute segment and the addon/note segment
pub const REQUEST_SEPARATOR: &str = " | ";

/// Order item status
///
/// ```text
/// pending ──accept──▶ accepted ──complete──▶ completed
///    │
///    └──reject──▶ rejected
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderItemStatus {
    #[default]
    Pending,
    Accepted,
    Completed,
    Rejected,
}

impl OrderItemStatus {
    /// No further transition is possible
    pub const fn is_terminal(self) -> bool {
        matches!(self, OrderItemStatus::Completed | OrderItemStatus::Rejected)
    }

    /// The kitchen can no longer change what this item costs
    pub const fn is_kitchen_resolved(self) -> bool {
        self.is_terminal()
    }

    /// Counts toward totals
    pub const fn is_billable(self) -> bool {
        !matches!(self, OrderItemStatus::Rejected)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            OrderItemStatus::Pending => "pending",
            OrderItemStatus::Accepted => "accepted",
            OrderItemStatus::Completed => "completed",
            OrderItemStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for OrderItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured customer request: `"<primary-attribute> | <addon-list-or-note>"`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct CustomerRequest {
    /// Single-choice attribute, e.g. spice level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    /// Addon list and/or free-text note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addon: Option<String>,
}

impl CustomerRequest {
    pub fn new(primary: Option<String>, addon: Option<String>) -> Self {
        Self {
            primary: primary.filter(|s| !s.trim().is_empty()),
            addon: addon.filter(|s| !s.trim().is_empty()),
        }
    }

    /// Parse the joined text form.
    ///
    /// A single segment without separator is read as the addon/note segment.
    pub fn parse(text: &str) -> Self {
        match text.split_once(REQUEST_SEPARATOR) {
            Some((primary, addon)) => Self::new(
                Some(primary.trim().to_string()),
                Some(addon.trim().to_string()),
            ),
            None => Self::new(None, Some(text.trim().to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.addon.is_none()
    }

    /// Grouping key segment used on receipts
    pub fn addon_segment(&self) -> Option<&str> {
        self.addon.as_deref()
    }
}

impl fmt::Display for CustomerRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.primary, &self.addon) {
            (Some(p), Some(a)) => write!(f, "{}{}{}", p, REQUEST_SEPARATOR, a),
            (Some(p), None) => f.write_str(p),
            (None, Some(a)) => f.write_str(a),
            (None, None) => Ok(()),
        }
    }
}

/// One ordered line within a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    pub order_item_id: i64,
    pub session_id: String,
    pub table_id: i64,
    /// Catalog reference
    pub item_id: i64,
    /// Denormalized at order time
    pub menu_name: String,
    pub quantity: i32,
    /// Base price plus option deltas, frozen at order time
    pub unit_price: Decimal,
    #[serde(default)]
    pub customer_request: CustomerRequest,
    pub status: OrderItemStatus,
    pub created_at: i64,
    pub updated_at: i64,
}
