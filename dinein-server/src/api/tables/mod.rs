//! Dining Table API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/tables | GET | 全部桌台 |
//! | /api/tables/{table_id} | GET | 单个桌台 |
//! | /api/tables/{table_id}/session | POST | 开台 (签发会话) |
//! | /api/tables/{table_id}/sessions/{session_id}/orders | GET | 会话订单 |
//! | /api/tables/{table_id}/sessions/{session_id}/validate | GET | 会话校验 |
//! | /api/tables/{table_id}/checkout | POST | 结账 |
//! | /api/tables/{table_id}/payment | POST | 确认收款 |
//! | /api/tables/{table_id}/clear | POST | 清台 (force 可选) |
//! | /api/tables/{table_id}/call | POST | 呼叫服务员 / 请求结账 |
//! | /api/tables/{table_id}/call/ack | POST | 确认呼叫 |
//! | /api/tables/{table_id}/items/accept-all | POST | 批量接单 |
//! | /api/tables/{table_id}/items/complete-all | POST | 批量出餐 |
//! | /api/tables/{table_id}/receipt | GET | 重建收据 |
//! | /api/tables/{table_id}/actions | GET | 可用操作 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    let lifecycle = Router::new()
        .route("/{table_id}/session", post(handler::issue_session))
        .route("/{table_id}/checkout", post(handler::checkout))
        .route("/{table_id}/payment", post(handler::payment_complete))
        .route("/{table_id}/clear", post(handler::clear))
        .route("/{table_id}/call", post(handler::call))
        .route("/{table_id}/call/ack", post(handler::acknowledge_call));

    let kitchen = Router::new()
        .route("/{table_id}/items/accept-all", post(handler::accept_all))
        .route("/{table_id}/items/complete-all", post(handler::complete_all));

    Router::new()
        .route("/", get(handler::list))
        .route("/{table_id}", get(handler::get_by_id))
        .route(
            "/{table_id}/sessions/{session_id}/orders",
            get(handler::session_orders),
        )
        .route(
            "/{table_id}/sessions/{session_id}/validate",
            get(handler::validate_session),
        )
        .route("/{table_id}/receipt", get(handler::receipt))
        .route("/{table_id}/actions", get(handler::actions))
        .merge(lifecycle)
        .merge(kitchen)
}
