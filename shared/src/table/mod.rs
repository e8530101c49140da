//! Table lifecycle
//!
//! - Machine: legal table status changes and the checkout guard
//! - Session: table ↔ session binding (issue / validate / close)
//! - Actions: what the staff panel may offer for a table right now

pub mod actions;
pub mod machine;
pub mod session;

pub use actions::TableActions;
pub use machine::{
    CallKind, CheckoutBlock, TableEvent, Transition, checkout_guard, close_reason_for, plan,
};
