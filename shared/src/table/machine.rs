//! Table State Machine
//!
//! ```text
//! available ──issue──▶ occupied ──checkout──▶ waiting_payment ──pay──▶ needs_clearing ──clear──▶ available
//!                      │   ▲
//!              call    ▼   │ ack
//!                calling / needs_checkout
//! ```
//!
//! `occupied`, `calling` and `needs_checkout` form the ordering family: calls
//! are advisory, so everything legal from `occupied` stays legal from the
//! other two. `checkout` is a legacy state with no inbound edge; it can
//! only be cleared.

use crate::error::{PosError, PosResult};
use crate::models::{SessionCloseReason, TableStatus};
use crate::order::LedgerSummary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer signal kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    /// 呼叫服务员
    Staff,
    /// 请求结账
    Bill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableEvent {
    IssueSession,
    SubmitOrder,
    RequestCheckout,
    ConfirmPayment,
    Clear { force: bool },
    Call(CallKind),
    AcknowledgeCall,
}

impl fmt::Display for TableEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableEvent::IssueSession => "issue session",
            TableEvent::SubmitOrder => "submit order",
            TableEvent::RequestCheckout => "checkout",
            TableEvent::ConfirmPayment => "confirm payment",
            TableEvent::Clear { force: false } => "clear",
            TableEvent::Clear { force: true } => "force clear",
            TableEvent::Call(CallKind::Staff) => "call staff",
            TableEvent::Call(CallKind::Bill) => "request bill",
            TableEvent::AcknowledgeCall => "acknowledge call",
        })
    }
}

/// Why the checkout guard refused
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckoutBlock {
    NoBillableItems,
    ItemsPending { count: usize },
    ItemsAccepted { count: usize },
}

impl CheckoutBlock {
    pub const fn reason_key(&self) -> &'static str {
        match self {
            CheckoutBlock::NoBillableItems => "no_billable_items",
            CheckoutBlock::ItemsPending { .. } => "items_pending",
            CheckoutBlock::ItemsAccepted { .. } => "items_accepted",
        }
    }
}

impl fmt::Display for CheckoutBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutBlock::NoBillableItems => f.write_str("there are no billable items in this session"),
            CheckoutBlock::ItemsPending { count } => {
                write!(f, "{count} items still pending in the kitchen")
            }
            CheckoutBlock::ItemsAccepted { count } => {
                write!(f, "{count} items accepted but not yet completed")
            }
        }
    }
}

/// Checkout guard: kitchen fully resolved and something left to bill
pub fn checkout_guard(summary: &LedgerSummary) -> Result<(), CheckoutBlock> {
    if summary.pending > 0 {
        return Err(CheckoutBlock::ItemsPending {
            count: summary.pending,
        });
    }
    if summary.accepted > 0 {
        return Err(CheckoutBlock::ItemsAccepted {
            count: summary.accepted,
        });
    }
    if summary.billable() == 0 {
        return Err(CheckoutBlock::NoBillableItems);
    }
    Ok(())
}

/// Planned status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: TableStatus,
    pub to: TableStatus,
    /// Set when the transition ends the visit and detaches the session
    pub closes_session: Option<SessionCloseReason>,
}

impl Transition {
    fn between(from: TableStatus, to: TableStatus) -> Self {
        Self {
            from,
            to,
            closes_session: None,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.from == self.to && self.closes_session.is_none()
    }
}

/// Close reason for a session detached from a table in `from`
pub const fn close_reason_for(from: TableStatus) -> SessionCloseReason {
    if from.is_clearable() {
        SessionCloseReason::CheckoutCompleted
    } else {
        SessionCloseReason::StaffClosed
    }
}

/// Decide the next status for `event`, or explain why it is refused
pub fn plan(
    table_id: i64,
    from: TableStatus,
    event: TableEvent,
    summary: &LedgerSummary,
) -> PosResult<Transition> {
    use TableStatus::*;

    let refuse = |reason: &str| PosError::InvalidTableTransition {
        table_id,
        from,
        event,
        reason: reason.to_string(),
    };

    match event {
        TableEvent::IssueSession => match from {
            Available => Ok(Transition::between(from, Occupied)),
            _ => Err(PosError::SessionAlreadyActive { table_id }),
        },

        TableEvent::SubmitOrder => {
            if from.is_ordering() {
                Ok(Transition::between(from, from))
            } else if from == Available {
                Err(refuse("table has no active session"))
            } else {
                Err(refuse("checkout already initiated for this visit"))
            }
        }

        TableEvent::RequestCheckout => {
            if from.is_ordering() {
                checkout_guard(summary).map_err(PosError::CheckoutBlocked)?;
                Ok(Transition::between(from, WaitingPayment))
            } else if from == Available {
                Err(refuse("table has no active session"))
            } else {
                Err(refuse("checkout already completed for this visit"))
            }
        }

        TableEvent::ConfirmPayment => match from {
            WaitingPayment => Ok(Transition::between(from, NeedsClearing)),
            _ => Err(refuse("table is not waiting for payment")),
        },

        TableEvent::Clear { force } => match from {
            Available => Ok(Transition::between(from, Available)),
            NeedsClearing | Checkout => Ok(Transition {
                from,
                to: Available,
                closes_session: Some(SessionCloseReason::CheckoutCompleted),
            }),
            _ if force => Ok(Transition {
                from,
                to: Available,
                closes_session: Some(SessionCloseReason::StaffClosed),
            }),
            _ => Err(refuse("table still has an active visit; use forced clear")),
        },

        TableEvent::Call(kind) => {
            if !from.is_ordering() {
                return Err(refuse("no ordering visit at this table"));
            }
            let to = match (kind, from) {
                (CallKind::Bill, _) => NeedsCheckout,
                // a pending bill request outranks a staff call
                (CallKind::Staff, NeedsCheckout) => NeedsCheckout,
                (CallKind::Staff, _) => Calling,
            };
            Ok(Transition::between(from, to))
        }

        TableEvent::AcknowledgeCall => match from {
            Calling | NeedsCheckout | Occupied => Ok(Transition::between(from, Occupied)),
            _ => Err(refuse("no call to acknowledge")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(pending: usize, accepted: usize, completed: usize, rejected: usize) -> LedgerSummary {
        LedgerSummary {
            pending,
            accepted,
            completed,
            rejected,
        }
    }

    #[test]
    fn test_checkout_guard() {
        assert_eq!(
            checkout_guard(&summary(1, 0, 3, 0)),
            Err(CheckoutBlock::ItemsPending { count: 1 })
        );
        assert_eq!(
            checkout_guard(&summary(0, 2, 0, 0)),
            Err(CheckoutBlock::ItemsAccepted { count: 2 })
        );
        assert_eq!(
            checkout_guard(&summary(0, 0, 0, 2)),
            Err(CheckoutBlock::NoBillableItems)
        );
        assert_eq!(checkout_guard(&summary(0, 0, 0, 0)), Err(CheckoutBlock::NoBillableItems));
        assert_eq!(checkout_guard(&summary(0, 0, 1, 5)), Ok(()));
    }

    #[test]
    fn test_checkout_from_ordering_family() {
        let ok = summary(0, 0, 1, 0);
        for from in [TableStatus::Occupied, TableStatus::Calling, TableStatus::NeedsCheckout] {
            let t = plan(1, from, TableEvent::RequestCheckout, &ok).unwrap();
            assert_eq!(t.to, TableStatus::WaitingPayment);
            assert!(t.closes_session.is_none());
        }

        let err = plan(1, TableStatus::Occupied, TableEvent::RequestCheckout, &summary(1, 0, 0, 0))
            .unwrap_err();
        assert!(matches!(err, PosError::CheckoutBlocked(CheckoutBlock::ItemsPending { count: 1 })));

        for from in [TableStatus::Available, TableStatus::WaitingPayment, TableStatus::NeedsClearing] {
            assert!(matches!(
                plan(1, from, TableEvent::RequestCheckout, &ok),
                Err(PosError::InvalidTableTransition { .. })
            ));
        }
    }

    #[test]
    fn test_issue_only_from_available() {
        let s = LedgerSummary::default();
        assert_eq!(
            plan(3, TableStatus::Available, TableEvent::IssueSession, &s).unwrap().to,
            TableStatus::Occupied
        );
        for from in TableStatus::ALL.into_iter().filter(|s| *s != TableStatus::Available) {
            assert!(matches!(
                plan(3, from, TableEvent::IssueSession, &s),
                Err(PosError::SessionAlreadyActive { table_id: 3 })
            ));
        }
    }

    #[test]
    fn test_payment_only_from_waiting_payment() {
        let s = LedgerSummary::default();
        for from in TableStatus::ALL {
            let result = plan(1, from, TableEvent::ConfirmPayment, &s);
            assert_eq!(result.is_ok(), from == TableStatus::WaitingPayment, "{from}");
        }
    }

    #[test]
    fn test_clear_semantics() {
        let s = LedgerSummary::default();
        let clear = TableEvent::Clear { force: false };
        let force = TableEvent::Clear { force: true };

        let noop = plan(1, TableStatus::Available, clear, &s).unwrap();
        assert!(noop.is_noop());

        for from in [TableStatus::NeedsClearing, TableStatus::Checkout] {
            let t = plan(1, from, clear, &s).unwrap();
            assert_eq!(t.to, TableStatus::Available);
            assert_eq!(t.closes_session, Some(SessionCloseReason::CheckoutCompleted));
        }

        for from in [
            TableStatus::Occupied,
            TableStatus::Calling,
            TableStatus::NeedsCheckout,
            TableStatus::WaitingPayment,
        ] {
            let err = plan(1, from, clear, &s).unwrap_err();
            assert!(err.to_string().contains("use forced clear"), "{err}");

            let t = plan(1, from, force, &s).unwrap();
            assert_eq!(t.to, TableStatus::Available);
            assert_eq!(t.closes_session, Some(SessionCloseReason::StaffClosed));
        }
    }

    #[test]
    fn test_calls_are_advisory() {
        let s = summary(0, 0, 1, 0);
        let t = plan(1, TableStatus::Occupied, TableEvent::Call(CallKind::Staff), &s).unwrap();
        assert_eq!(t.to, TableStatus::Calling);
        let t = plan(1, TableStatus::Calling, TableEvent::Call(CallKind::Bill), &s).unwrap();
        assert_eq!(t.to, TableStatus::NeedsCheckout);
        let t = plan(1, TableStatus::NeedsCheckout, TableEvent::Call(CallKind::Staff), &s).unwrap();
        assert_eq!(t.to, TableStatus::NeedsCheckout);

        let t = plan(1, TableStatus::NeedsCheckout, TableEvent::AcknowledgeCall, &s).unwrap();
        assert_eq!(t.to, TableStatus::Occupied);

        assert!(plan(1, TableStatus::Calling, TableEvent::SubmitOrder, &s).is_ok());
        assert!(plan(1, TableStatus::WaitingPayment, TableEvent::Call(CallKind::Staff), &s).is_err());
        assert!(plan(1, TableStatus::WaitingPayment, TableEvent::SubmitOrder, &s).is_err());
    }

    #[test]
    fn test_close_reason_for() {
        assert_eq!(close_reason_for(TableStatus::NeedsClearing), SessionCloseReason::CheckoutCompleted);
        assert_eq!(close_reason_for(TableStatus::WaitingPayment), SessionCloseReason::StaffClosed);
        assert_eq!(close_reason_for(TableStatus::Occupied), SessionCloseReason::StaffClosed);
    }
}
