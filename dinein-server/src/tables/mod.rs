//! 桌台 / 会话 / 账本
//!
//! [`TablesManager`] 是唯一的写入口，[`store::Store`] 是它持有的内存状态。

pub mod manager;
pub mod store;

pub use manager::{ManagerResult, TablesManager};
