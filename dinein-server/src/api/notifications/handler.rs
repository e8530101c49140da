//! Notification API Handlers

use axum::extract::{Path, Query, State};
use shared::models::Notification;
use shared::request::NotificationQuery;
use shared::response::MarkedRead;

use crate::api::ok;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/notifications?since_id=&unread_only=
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<NotificationQuery>,
) -> AppResult<ApiResponse<Vec<Notification>>> {
    ok(state.notifications.list(query.since_id, query.unread_only))
}

/// POST /api/notifications/{notification_id}/read
pub async fn mark_read(
    State(state): State<ServerState>,
    Path(notification_id): Path<i64>,
) -> AppResult<ApiResponse<Notification>> {
    ok(state.notifications.mark_read(notification_id)?)
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(State(state): State<ServerState>) -> AppResult<ApiResponse<MarkedRead>> {
    ok(MarkedRead {
        updated: state.notifications.mark_all_read(),
    })
}
