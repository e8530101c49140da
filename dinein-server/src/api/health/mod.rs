//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/health | GET | 桌台数与活跃会话数 |
//!
//! ```json
//! { "status": "ok", "tables": 12, "active_sessions": 3 }
//! ```

use axum::{Router, extract::State, routing::get};
use shared::response::HealthResponse;

use crate::api::ok;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

async fn health(State(state): State<ServerState>) -> AppResult<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok".to_string(),
        tables: state.tables.table_count(),
        active_sessions: state.tables.active_sessions(),
    })
}
