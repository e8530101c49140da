//! Unified error codes for the dine-in system
//!
//! This module defines all error codes used across dinein-server, dinein-client
//! and the browser panels. Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order / ledger errors
//! - 6xxx: Catalog errors
//! - 7xxx: Table and session errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Order ====================
    /// Order item not found
    OrderItemNotFound = 4006,
    /// Order item status change not legal from its current status
    InvalidItemTransition = 4101,
    /// Ledger is locked for edits (checkout initiated or item already handled)
    ItemEditLocked = 4102,
    /// One or more items in a bulk operation failed
    PartialBulkFailure = 4103,
    /// Quantity must be at least 1
    InvalidQuantity = 4104,

    // ==================== 6xxx: Catalog ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item is not orderable right now
    CatalogUnavailable = 6003,
    /// Option value does not belong to an option type of the item
    OptionNotApplicable = 6301,
    /// A required single-choice option has no selection or no candidates
    OptionRequired = 6302,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table status change not legal from its current status
    InvalidTableTransition = 7002,
    /// Checkout guard refused (pending/accepted items or empty bill)
    CheckoutBlocked = 7003,
    /// Receipt requested before checkout
    ReceiptNotReady = 7004,
    /// Table already has an active session
    SessionAlreadyActive = 7201,
    /// Presented session no longer matches the table's active session
    SessionInvalid = 7202,
    /// Session not found
    SessionNotFound = 7203,
    /// Session still bound to a table
    SessionStillActive = 7204,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout, outcome unknown
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Order
            ErrorCode::OrderItemNotFound => "Order item not found",
            ErrorCode::InvalidItemTransition => "Order item cannot make this status change",
            ErrorCode::ItemEditLocked => "Order items can no longer be edited",
            ErrorCode::PartialBulkFailure => "Some items could not be updated",
            ErrorCode::InvalidQuantity => "Quantity must be at least 1",

            // Catalog
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::CatalogUnavailable => "Menu item is currently unavailable",
            ErrorCode::OptionNotApplicable => "Option does not apply to this menu item",
            ErrorCode::OptionRequired => "A required option has not been chosen",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::InvalidTableTransition => "Table cannot make this status change",
            ErrorCode::CheckoutBlocked => "Checkout is not allowed yet",
            ErrorCode::ReceiptNotReady => "Receipt is not available before checkout",
            ErrorCode::SessionAlreadyActive => "Table already has an active session",
            ErrorCode::SessionInvalid => "Session is no longer valid",
            ErrorCode::SessionNotFound => "Session not found",
            ErrorCode::SessionStillActive => "Session is still active",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out, outcome unknown",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Order
            4006 => Ok(ErrorCode::OrderItemNotFound),
            4101 => Ok(ErrorCode::InvalidItemTransition),
            4102 => Ok(ErrorCode::ItemEditLocked),
            4103 => Ok(ErrorCode::PartialBulkFailure),
            4104 => Ok(ErrorCode::InvalidQuantity),

            // Catalog
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6003 => Ok(ErrorCode::CatalogUnavailable),
            6301 => Ok(ErrorCode::OptionNotApplicable),
            6302 => Ok(ErrorCode::OptionRequired),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::InvalidTableTransition),
            7003 => Ok(ErrorCode::CheckoutBlocked),
            7004 => Ok(ErrorCode::ReceiptNotReady),
            7201 => Ok(ErrorCode::SessionAlreadyActive),
            7202 => Ok(ErrorCode::SessionInvalid),
            7203 => Ok(ErrorCode::SessionNotFound),
            7204 => Ok(ErrorCode::SessionStillActive),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
