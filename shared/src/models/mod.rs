//! Data models shared by the staff panel, the customer page and the server

pub mod catalog;
pub mod dining_table;
pub mod notification;
pub mod order_item;
pub mod session;

pub use catalog::{Catalog, Category, MenuItem, OptionType, OptionValue, SelectionMode};
pub use dining_table::{DiningTable, TableStatus};
pub use notification::{Notification, NotificationType};
pub use order_item::{CustomerRequest, OrderItem, OrderItemStatus, REQUEST_SEPARATOR};
pub use session::{
    SessionCloseReason, SessionInvalidReason, SessionValidation, TableSession,
};
