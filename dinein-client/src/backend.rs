//! 后端抽象 - 权威状态存储的数据契约
//!
//! The panels only talk to this trait. [`crate::HttpClient`] implements it
//! over REST; tests swap in an in-memory store.

use async_trait::async_trait;
use shared::models::{Catalog, DiningTable, MenuItem, Notification, SessionValidation};
use shared::order::{CheckoutSnapshot, ItemAction, OrderSelection, SessionOrders};
use shared::request::NotificationQuery;
use shared::response::{
    BulkResponse, CheckoutResponse, IssuedSession, ItemResponse, MarkedRead, RemovedItem,
    SubmitOrderResponse,
};
use shared::table::{CallKind, TableActions};

use crate::ClientResult;

/// Every mutation returns post-transition state so callers can re-synchronise
#[async_trait]
pub trait PosBackend: Send + Sync {
    // ========== Tables ==========
    async fn list_tables(&self) -> ClientResult<Vec<DiningTable>>;
    async fn table(&self, table_id: i64) -> ClientResult<DiningTable>;
    async fn actions(&self, table_id: i64) -> ClientResult<TableActions>;
    async fn receipt(&self, table_id: i64) -> ClientResult<CheckoutSnapshot>;

    // ========== Sessions ==========
    async fn issue_session(&self, table_id: i64) -> ClientResult<IssuedSession>;
    async fn validate_session(&self, table_id: i64, session_id: &str) -> ClientResult<SessionValidation>;
    async fn session_orders(&self, table_id: i64, session_id: &str) -> ClientResult<SessionOrders>;
    async fn submit_order(
        &self,
        session_id: &str,
        items: &[OrderSelection],
    ) -> ClientResult<SubmitOrderResponse>;

    // ========== Items ==========
    async fn item_transition(&self, order_item_id: i64, action: ItemAction) -> ClientResult<ItemResponse>;
    async fn change_quantity(&self, order_item_id: i64, quantity: i32) -> ClientResult<ItemResponse>;
    async fn remove_item(&self, order_item_id: i64) -> ClientResult<RemovedItem>;
    /// Partial failure is not an error; inspect the report
    async fn bulk(
        &self,
        table_id: i64,
        action: ItemAction,
        order_item_ids: Option<Vec<i64>>,
    ) -> ClientResult<BulkResponse>;

    // ========== Lifecycle ==========
    async fn checkout(&self, table_id: i64, session_id: &str) -> ClientResult<CheckoutResponse>;
    async fn payment_complete(&self, table_id: i64) -> ClientResult<DiningTable>;
    async fn clear_table(&self, table_id: i64, force: bool) -> ClientResult<DiningTable>;
    async fn call(&self, table_id: i64, kind: CallKind) -> ClientResult<DiningTable>;
    async fn acknowledge_call(&self, table_id: i64) -> ClientResult<DiningTable>;

    // ========== Catalog ==========
    async fn catalog(&self) -> ClientResult<Catalog>;
    async fn set_availability(&self, item_id: i64, available: bool) -> ClientResult<MenuItem>;

    // ========== Notifications ==========
    async fn notifications(&self, query: NotificationQuery) -> ClientResult<Vec<Notification>>;
    async fn mark_read(&self, notification_id: i64) -> ClientResult<Notification>;
    async fn mark_all_read(&self) -> ClientResult<MarkedRead>;
}
