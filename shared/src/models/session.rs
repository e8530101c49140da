//! Table Session Model
//!
//! One customer visit to one table. Records outlive the binding so that a
//! stale session can be told apart from one that never existed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a session stopped being bound to its table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionCloseReason {
    /// Normal path: checkout, payment, clear
    CheckoutCompleted,
    /// Administrative close before the visit finished
    StaffClosed,
}

/// Session entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSession {
    /// Opaque token handed to the customer (QR payload)
    pub session_id: String,
    pub table_id: i64,
    /// Arrival timestamp
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_reason: Option<SessionCloseReason>,
}

impl TableSession {
    pub fn new(session_id: impl Into<String>, table_id: i64, created_at: i64) -> Self {
        Self {
            session_id: session_id.into(),
            table_id,
            created_at,
            checkout_at: None,
            closed_at: None,
            close_reason: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.closed_at.is_none()
    }

    /// Mark closed; a session is closed at most once
    pub fn close(&mut self, reason: SessionCloseReason, now: i64) {
        if self.closed_at.is_none() {
            self.closed_at = Some(now);
            self.close_reason = Some(reason);
        }
    }
}

/// Why a presented session is not valid
///
/// All variants are terminal for the presenting client: it must not retry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionInvalidReason {
    /// 已结账 - the visit finished normally
    CheckoutCompleted,
    /// 服务员关闭 - closed early by staff
    ClosedByStaff,
    /// The table is serving a different (newer) visit
    Superseded,
    /// Never issued for this table
    Unknown,
}

impl SessionInvalidReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            SessionInvalidReason::CheckoutCompleted => "checkout_completed",
            SessionInvalidReason::ClosedByStaff => "closed_by_staff",
            SessionInvalidReason::Superseded => "superseded",
            SessionInvalidReason::Unknown => "unknown",
        }
    }

    /// Text for the customer's full-screen notice
    pub const fn message(self) -> &'static str {
        match self {
            SessionInvalidReason::CheckoutCompleted => {
                "This visit has already been checked out. Please ask staff for a new QR code."
            }
            SessionInvalidReason::ClosedByStaff => {
                "This table session was closed by staff. Please ask staff for a new QR code."
            }
            SessionInvalidReason::Superseded => {
                "This QR code belongs to an earlier visit. Please scan the current QR code."
            }
            SessionInvalidReason::Unknown => "This QR code is not valid for this table.",
        }
    }
}

impl fmt::Display for SessionInvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SessionCloseReason> for SessionInvalidReason {
    fn from(reason: SessionCloseReason) -> Self {
        match reason {
            SessionCloseReason::CheckoutCompleted => SessionInvalidReason::CheckoutCompleted,
            SessionCloseReason::StaffClosed => SessionInvalidReason::ClosedByStaff,
        }
    }
}

/// Result of `validateSession`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<SessionInvalidReason>,
}

impl SessionValidation {
    pub const fn valid() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub const fn invalid(reason: SessionInvalidReason) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_is_first_write_wins() {
        let mut session = TableSession::new("s-1", 1, 100);
        assert!(session.is_active());

        session.close(SessionCloseReason::StaffClosed, 200);
        session.close(SessionCloseReason::CheckoutCompleted, 300);

        assert!(!session.is_active());
        assert_eq!(session.closed_at, Some(200));
        assert_eq!(session.close_reason, Some(SessionCloseReason::StaffClosed));
    }

    #[test]
    fn test_validation_serialization() {
        let json = serde_json::to_string(&SessionValidation::valid()).unwrap();
        assert_eq!(json, r#"{"valid":true}"#);

        let json = serde_json::to_string(&SessionValidation::invalid(
            SessionInvalidReason::CheckoutCompleted,
        ))
        .unwrap();
        assert_eq!(json, r#"{"valid":false,"reason":"checkout_completed"}"#);
    }

    #[test]
    fn test_close_reason_maps_to_invalid_reason() {
        assert_eq!(
            SessionInvalidReason::from(SessionCloseReason::StaffClosed),
            SessionInvalidReason::ClosedByStaff
        );
        assert_eq!(
            SessionInvalidReason::from(SessionCloseReason::CheckoutCompleted),
            SessionInvalidReason::CheckoutCompleted
        );
    }
}
