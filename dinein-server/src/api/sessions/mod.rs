//! Session API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/sessions/{session_id}/orders | POST | 顾客下单 |
//! | /api/sessions/{session_id} | DELETE | 清理已关闭会话 (管理) |

mod handler;

use axum::{
    Router,
    routing::{delete, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sessions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{session_id}/orders", post(handler::submit_order))
        .route("/{session_id}", delete(handler::purge))
}
