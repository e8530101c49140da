//! Session API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::request::SubmitOrderRequest;
use shared::response::{PurgedSession, SubmitOrderResponse};

use crate::api::ok;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// POST /api/sessions/{session_id}/orders - 顾客下单
///
/// 售罄的行单独拒绝 (见 `rejected`)，其余照常入账。
pub async fn submit_order(
    State(state): State<ServerState>,
    Path(session_id): Path<String>,
    Json(payload): Json<SubmitOrderRequest>,
) -> AppResult<ApiResponse<SubmitOrderResponse>> {
    ok(state.tables.submit_order(&session_id, &payload.items)?)
}

/// DELETE /api/sessions/{session_id} - 删除已关闭会话及其菜品
pub async fn purge(
    State(state): State<ServerState>,
    Path(session_id): Path<String>,
) -> AppResult<ApiResponse<PurgedSession>> {
    ok(state.tables.purge_session(&session_id)?)
}
