//! Catalog API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Catalog, MenuItem};
use shared::request::AvailabilityRequest;

use crate::api::ok;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/catalog - 分类、菜品、选项
pub async fn get_catalog(State(state): State<ServerState>) -> AppResult<ApiResponse<Catalog>> {
    ok(state.catalog.snapshot())
}

/// PUT /api/catalog/items/{item_id}/availability - 上下架
pub async fn set_availability(
    State(state): State<ServerState>,
    Path(item_id): Path<i64>,
    Json(payload): Json<AvailabilityRequest>,
) -> AppResult<ApiResponse<MenuItem>> {
    ok(state.catalog.set_availability(item_id, payload.available)?)
}
