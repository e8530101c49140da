//! Domain errors raised by the table/session/order state machines
//!
//! Every variant maps onto an [`ErrorCode`] and keeps the specific guard
//! reason, so the message a user sees is never a generic failure.

use super::{AppError, ErrorCode};
use crate::models::{OrderItemStatus, SessionInvalidReason, TableStatus};
use crate::order::ItemAction;
use crate::table::{CheckoutBlock, TableEvent};
use thiserror::Error;

/// Entity kinds used by [`PosError::NotFound`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Table,
    Session,
    OrderItem,
    MenuItem,
    Notification,
}

impl Resource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Resource::Table => "table",
            Resource::Session => "session",
            Resource::OrderItem => "order_item",
            Resource::MenuItem => "menu_item",
            Resource::Notification => "notification",
        }
    }

    const fn not_found_code(self) -> ErrorCode {
        match self {
            Resource::Table => ErrorCode::TableNotFound,
            Resource::Session => ErrorCode::SessionNotFound,
            Resource::OrderItem => ErrorCode::OrderItemNotFound,
            Resource::MenuItem => ErrorCode::MenuItemNotFound,
            Resource::Notification => ErrorCode::NotFound,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PosError {
    #[error("cannot {action} item {order_item_id}: item is {from}")]
    InvalidItemTransition {
        order_item_id: i64,
        from: OrderItemStatus,
        action: ItemAction,
    },

    #[error("cannot {event} on table {table_id} while {from}: {reason}")]
    InvalidTableTransition {
        table_id: i64,
        from: TableStatus,
        event: TableEvent,
        reason: String,
    },

    #[error("checkout blocked: {0}")]
    CheckoutBlocked(CheckoutBlock),

    #[error("table {table_id} already has an active session")]
    SessionAlreadyActive { table_id: i64 },

    #[error("{}", .0.message())]
    SessionInvalid(SessionInvalidReason),

    #[error("session {session_id} is still active")]
    SessionStillActive { session_id: String },

    #[error("{name} is not available right now")]
    CatalogUnavailable { item_id: i64, name: String },

    #[error("option value {value_id} does not apply to menu item {item_id}")]
    OptionNotApplicable { item_id: i64, value_id: i64 },

    #[error("a choice for {option_type} is required")]
    OptionRequired { option_type: String },

    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i32),

    #[error("quantity exceeds maximum allowed ({max}), got {quantity}")]
    QuantityOutOfRange { quantity: i32, max: i32 },

    #[error("item {order_item_id} can no longer be edited: {reason}")]
    EditLocked { order_item_id: i64, reason: String },

    #[error("receipt for table {table_id} is not available while {status}")]
    ReceiptNotReady { table_id: i64, status: TableStatus },

    #[error("{operation} did not finish in time; outcome is uncertain")]
    NetworkTimeout { operation: String },

    #[error("{failed} of {total} items failed")]
    PartialBulkFailure { failed: usize, total: usize },

    #[error("{} {id} not found", .resource.as_str())]
    NotFound { resource: Resource, id: String },

    #[error("{0}")]
    Validation(String),
}

impl PosError {
    pub fn not_found(resource: Resource, id: impl ToString) -> Self {
        PosError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            PosError::InvalidItemTransition { .. } => ErrorCode::InvalidItemTransition,
            PosError::InvalidTableTransition { .. } => ErrorCode::InvalidTableTransition,
            PosError::CheckoutBlocked(_) => ErrorCode::CheckoutBlocked,
            PosError::SessionAlreadyActive { .. } => ErrorCode::SessionAlreadyActive,
            PosError::SessionInvalid(_) => ErrorCode::SessionInvalid,
            PosError::SessionStillActive { .. } => ErrorCode::SessionStillActive,
            PosError::CatalogUnavailable { .. } => ErrorCode::CatalogUnavailable,
            PosError::OptionNotApplicable { .. } => ErrorCode::OptionNotApplicable,
            PosError::OptionRequired { .. } => ErrorCode::OptionRequired,
            PosError::InvalidQuantity(_) => ErrorCode::InvalidQuantity,
            PosError::QuantityOutOfRange { .. } => ErrorCode::ValueOutOfRange,
            PosError::EditLocked { .. } => ErrorCode::ItemEditLocked,
            PosError::ReceiptNotReady { .. } => ErrorCode::ReceiptNotReady,
            PosError::NetworkTimeout { .. } => ErrorCode::TimeoutError,
            PosError::PartialBulkFailure { .. } => ErrorCode::PartialBulkFailure,
            PosError::NotFound { resource, .. } => resource.not_found_code(),
            PosError::Validation(_) => ErrorCode::ValidationFailed,
        }
    }

    /// Machine-readable reason key carried in `details.reason`
    pub fn reason_key(&self) -> &'static str {
        match self {
            PosError::InvalidItemTransition { .. } | PosError::InvalidTableTransition { .. } => {
                "invalid_transition"
            }
            PosError::CheckoutBlocked(block) => block.reason_key(),
            PosError::SessionAlreadyActive { .. } => "session_already_active",
            PosError::SessionInvalid(reason) => reason.as_str(),
            PosError::SessionStillActive { .. } => "session_still_active",
            PosError::CatalogUnavailable { .. } => "catalog_unavailable",
            PosError::OptionNotApplicable { .. } => "option_not_applicable",
            PosError::OptionRequired { .. } => "option_required",
            PosError::InvalidQuantity(_) => "invalid_quantity",
            PosError::QuantityOutOfRange { .. } => "quantity_out_of_range",
            PosError::EditLocked { .. } => "edit_locked",
            PosError::ReceiptNotReady { .. } => "receipt_not_ready",
            PosError::NetworkTimeout { .. } => "uncertain",
            PosError::PartialBulkFailure { .. } => "partial_bulk_failure",
            PosError::NotFound { .. } => "not_found",
            PosError::Validation(_) => "validation",
        }
    }
}

impl From<PosError> for AppError {
    fn from(err: PosError) -> Self {
        let base = AppError::with_message(err.code(), err.to_string())
            .with_detail("reason", err.reason_key());
        match err {
            PosError::InvalidItemTransition {
                order_item_id,
                from,
                ..
            } => base
                .with_detail("order_item_id", order_item_id)
                .with_detail("status", from.as_str()),
            PosError::InvalidTableTransition { table_id, from, .. } => base
                .with_detail("table_id", table_id)
                .with_detail("status", from.as_str()),
            PosError::SessionAlreadyActive { table_id } => base.with_detail("table_id", table_id),
            PosError::CatalogUnavailable { item_id, .. } => base.with_detail("item_id", item_id),
            PosError::EditLocked { order_item_id, .. } => {
                base.with_detail("order_item_id", order_item_id)
            }
            PosError::ReceiptNotReady { table_id, status } => base
                .with_detail("table_id", table_id)
                .with_detail("status", status.as_str()),
            PosError::QuantityOutOfRange { max, .. } => base.with_detail("max", max),
            PosError::PartialBulkFailure { failed, total } => base
                .with_detail("failed", failed)
                .with_detail("total", total),
            PosError::NotFound { resource, id } => base
                .with_detail("resource", resource.as_str())
                .with_detail("id", id),
            _ => base,
        }
    }
}
