//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::PosError;
use shared::models::{DiningTable, SessionValidation};
use shared::order::{CheckoutSnapshot, ItemAction, SessionOrders};
use shared::request::{BulkItemsRequest, CallRequest, CheckoutRequest, ClearTableRequest};
use shared::response::{BulkResponse, CheckoutResponse, IssuedSession};
use shared::table::TableActions;

use crate::api::ok;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult};

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<DiningTable>>> {
    ok(state.tables.list_tables())
}

/// GET /api/tables/{table_id} - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
) -> AppResult<ApiResponse<DiningTable>> {
    ok(state.tables.get_table(table_id)?)
}

/// POST /api/tables/{table_id}/session - 开台
pub async fn issue_session(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
) -> AppResult<ApiResponse<IssuedSession>> {
    let (table, session) = state.tables.issue_session(table_id)?;
    let qr_payload = state.config.qr_payload(table_id, &session.session_id);
    ok(IssuedSession {
        session_id: session.session_id,
        qr_payload,
        table,
    })
}

/// GET /api/tables/{table_id}/sessions/{session_id}/orders
pub async fn session_orders(
    State(state): State<ServerState>,
    Path((table_id, session_id)): Path<(i64, String)>,
) -> AppResult<ApiResponse<SessionOrders>> {
    ok(state.tables.session_orders(table_id, &session_id)?)
}

/// GET /api/tables/{table_id}/sessions/{session_id}/validate
///
/// 无效会话不是错误：返回 `valid: false` 和原因。
pub async fn validate_session(
    State(state): State<ServerState>,
    Path((table_id, session_id)): Path<(i64, String)>,
) -> AppResult<ApiResponse<SessionValidation>> {
    ok(state.tables.validate_session(table_id, &session_id)?)
}

/// POST /api/tables/{table_id}/checkout - 结账
pub async fn checkout(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    ok(state.tables.checkout(table_id, &payload.session_id)?)
}

/// POST /api/tables/{table_id}/payment - 确认收款
pub async fn payment_complete(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
) -> AppResult<ApiResponse<DiningTable>> {
    ok(state.tables.payment_complete(table_id)?)
}

/// POST /api/tables/{table_id}/clear - 清台
pub async fn clear(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
    Json(payload): Json<ClearTableRequest>,
) -> AppResult<ApiResponse<DiningTable>> {
    ok(state.tables.clear_table(table_id, payload.force)?)
}

/// POST /api/tables/{table_id}/call
pub async fn call(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
    Json(payload): Json<CallRequest>,
) -> AppResult<ApiResponse<DiningTable>> {
    ok(state.tables.call(table_id, payload.kind)?)
}

/// POST /api/tables/{table_id}/call/ack
pub async fn acknowledge_call(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
) -> AppResult<ApiResponse<DiningTable>> {
    ok(state.tables.acknowledge_call(table_id)?)
}

/// POST /api/tables/{table_id}/items/accept-all
pub async fn accept_all(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
    Json(payload): Json<BulkItemsRequest>,
) -> AppResult<ApiResponse<BulkResponse>> {
    bulk(&state, table_id, ItemAction::Accept, payload)
}

/// POST /api/tables/{table_id}/items/complete-all
pub async fn complete_all(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
    Json(payload): Json<BulkItemsRequest>,
) -> AppResult<ApiResponse<BulkResponse>> {
    bulk(&state, table_id, ItemAction::Complete, payload)
}

/// 部分失败时返回 207，成功的部分照常带在 data 里
fn bulk(
    state: &ServerState,
    table_id: i64,
    action: ItemAction,
    payload: BulkItemsRequest,
) -> AppResult<ApiResponse<BulkResponse>> {
    let resp = state.tables.bulk(table_id, action, payload.order_item_ids)?;
    if !resp.report.is_partial_failure() {
        return ok(resp);
    }
    let err = AppError::from(PosError::PartialBulkFailure {
        failed: resp.report.failed.len(),
        total: resp.report.total(),
    });
    Ok(ApiResponse {
        code: Some(err.code.code()),
        message: err.message,
        data: Some(resp),
        details: err.details,
    })
}

/// GET /api/tables/{table_id}/receipt - 按桌台状态重建收据
pub async fn receipt(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
) -> AppResult<ApiResponse<CheckoutSnapshot>> {
    ok(state.tables.receipt(table_id)?)
}

/// GET /api/tables/{table_id}/actions
pub async fn actions(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
) -> AppResult<ApiResponse<TableActions>> {
    ok(state.tables.actions(table_id)?)
}
