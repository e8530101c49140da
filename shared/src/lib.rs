//! Shared types for the dine-in POS
//!
//! Domain models, the table/session/order state machines and the billing
//! rules used by both the server and the staff/customer clients, plus the
//! unified error and API response types.

pub mod error;
pub mod models;
pub mod order;
pub mod request;
pub mod response;
pub mod table;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode, PosError, PosResult};
pub use http;
pub use serde::{Deserialize, Serialize};
