//! Session Manager
//!
//! Issues and invalidates the table ↔ session binding. The session record
//! outlives the binding so `validate` can tell "checked out" from "closed by
//! staff" after the fact.

use super::machine::{TableEvent, plan};
use crate::error::PosResult;
use crate::models::{
    DiningTable, SessionCloseReason, SessionInvalidReason, SessionValidation, TableSession,
    TableStatus,
};
use crate::order::LedgerSummary;
use crate::util::new_session_token;

/// Bind a fresh session to an available table
pub fn issue(table: &mut DiningTable, now: i64) -> PosResult<TableSession> {
    let transition = plan(
        table.table_id,
        table.status,
        TableEvent::IssueSession,
        &LedgerSummary::default(),
    )?;
    let session = TableSession::new(new_session_token(), table.table_id, now);
    table.status = transition.to;
    table.session_id = Some(session.session_id.clone());
    table.checkout_at = None;
    table.updated_at = now;
    Ok(session)
}

/// Check a presented session against the table's current binding
///
/// `record` is the stored session with that id, if any.
pub fn validate(
    table: &DiningTable,
    session_id: &str,
    record: Option<&TableSession>,
) -> SessionValidation {
    if table.status != TableStatus::Available && table.is_bound_to(session_id) {
        return SessionValidation::valid();
    }
    let reason = match record {
        Some(session) if session.table_id != table.table_id => SessionInvalidReason::Unknown,
        Some(session) => match session.close_reason {
            Some(close) => close.into(),
            None => SessionInvalidReason::Superseded,
        },
        None => SessionInvalidReason::Unknown,
    };
    SessionValidation::invalid(reason)
}

/// Detach the table's session and return it to `available`
///
/// Always legal. Returns the detached session id, if there was one.
pub fn close(
    table: &mut DiningTable,
    session: Option<&mut TableSession>,
    reason: SessionCloseReason,
    now: i64,
) -> Option<String> {
    if let Some(session) = session {
        session.close(reason, now);
    }
    let detached = table.session_id.take();
    table.status = TableStatus::Available;
    table.checkout_at = None;
    table.updated_at = now;
    detached
}
