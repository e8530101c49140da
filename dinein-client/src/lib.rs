//! Dine-in Client - 员工端 / 顾客端的观察同步层
//!
//! - [`HttpClient`]: REST backend implementing [`PosBackend`]
//! - [`StaffPanel`]: table lifecycle and kitchen actions over a [`LocalView`]
//! - [`CustomerSession`]: ordering from a scanned QR session
//! - [`Poller`]: fast (notifications) and slow (full refresh) polling loops

pub mod backend;
pub mod config;
pub mod customer;
pub mod error;
pub mod http;
pub mod locks;
pub mod poller;
pub mod staff;
pub mod view;

pub use backend::PosBackend;
pub use config::ClientConfig;
pub use customer::{CustomerSession, SessionState};
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use locks::{EntityKey, EntityLocks};
pub use poller::Poller;
pub use staff::StaffPanel;
pub use view::LocalView;

// Re-export shared types for convenience
pub use shared::models::{DiningTable, Notification, OrderItem, TableStatus};
pub use shared::order::{CheckoutSnapshot, OrderSelection, SessionOrders};
