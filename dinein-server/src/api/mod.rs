//! API 路由模块
//!
//! # 结构
//!
//! - [`tables`] - 桌台生命周期 (开台/结账/收款/清台/呼叫)
//! - [`sessions`] - 顾客点餐、会话清理
//! - [`items`] - 厨房处理、改数量、删菜
//! - [`catalog`] - 菜单与上下架
//! - [`notifications`] - 通知拉取与已读
//! - [`health`] - 健康检查
//!
//! 所有响应都是 `ApiResponse<T>`，变更类接口返回迁移后的桌台。

pub mod catalog;
pub mod health;
pub mod items;
pub mod notifications;
pub mod sessions;
pub mod tables;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppError, AppResult};

/// Wrap handler output in the success envelope
pub(crate) fn ok<T>(data: T) -> AppResult<ApiResponse<T>> {
    Ok(ApiResponse::success(data))
}
