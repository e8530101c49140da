//! Notification API 模块
//!
//! 轮询式投递：客户端带上 `since_id` 拉取增量，并按 `notification_id` 去重。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{notification_id}/read", post(handler::mark_read))
        .route("/read-all", post(handler::mark_all_read))
}
