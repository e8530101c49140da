//! Order Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::order::ItemAction;
use shared::request::ChangeQuantityRequest;
use shared::response::{ItemResponse, RemovedItem};

use crate::api::ok;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// POST /api/items/{order_item_id}/{action}
pub async fn transition(
    State(state): State<ServerState>,
    Path((order_item_id, action)): Path<(i64, String)>,
) -> AppResult<ApiResponse<ItemResponse>> {
    let action: ItemAction = action.parse()?;
    ok(state.tables.transition_item(order_item_id, action)?)
}

/// PATCH /api/items/{order_item_id} - 修改数量
pub async fn change_quantity(
    State(state): State<ServerState>,
    Path(order_item_id): Path<i64>,
    Json(payload): Json<ChangeQuantityRequest>,
) -> AppResult<ApiResponse<ItemResponse>> {
    ok(state
        .tables
        .change_quantity(order_item_id, payload.quantity)?)
}

/// DELETE /api/items/{order_item_id}
pub async fn remove(
    State(state): State<ServerState>,
    Path(order_item_id): Path<i64>,
) -> AppResult<ApiResponse<RemovedItem>> {
    ok(state.tables.remove_item(order_item_id)?)
}
