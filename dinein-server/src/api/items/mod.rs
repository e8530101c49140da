//! Order Item API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/items/{order_item_id}/{action} | POST | accept / reject / complete |
//! | /api/items/{order_item_id} | PATCH | 修改数量 (仅 pending) |
//! | /api/items/{order_item_id} | DELETE | 删除 (仅 pending) |

mod handler;

use axum::{
    Router,
    routing::{patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/items", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{order_item_id}/{action}", post(handler::transition))
        .route(
            "/{order_item_id}",
            patch(handler::change_quantity).delete(handler::remove),
        )
}
