//! Order module
//!
//! - Builder: catalog selection → priced line item draft
//! - Ledger: per-session items and their status transitions
//! - Billing: totals and receipt grouping
//! - Snapshot: checkout snapshot and session order views

pub mod billing;
pub mod builder;
pub mod ledger;
pub mod snapshot;
pub mod types;

// Re-exports
pub use billing::{ReceiptLine, group_for_receipt, line_total, round_money, session_total};
pub use builder::OrderBuilder;
pub use ledger::{ItemAction, Ledger, LedgerSummary, transition, validate_quantity};
pub use snapshot::{CheckoutSnapshot, SessionOrders};
pub use types::*;
