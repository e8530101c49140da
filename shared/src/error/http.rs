//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrderItemNotFound
            | Self::MenuItemNotFound
            | Self::TableNotFound
            | Self::SessionNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict (state does not allow the action)
            Self::InvalidItemTransition
            | Self::InvalidTableTransition
            | Self::CheckoutBlocked
            | Self::ReceiptNotReady
            | Self::ItemEditLocked
            | Self::SessionAlreadyActive
            | Self::SessionStillActive => StatusCode::CONFLICT,

            // 410 Gone - the session will never become valid again
            Self::SessionInvalid => StatusCode::GONE,

            // 207 Multi-Status - per-item outcomes are in the body
            Self::PartialBulkFailure => StatusCode::MULTI_STATUS,

            // 422 Unprocessable - catalog refused the line
            Self::CatalogUnavailable | Self::OptionNotApplicable | Self::OptionRequired => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            // 503 Service Unavailable (transient errors, client must re-check state)
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError | Self::ConfigError | Self::Unknown => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation errors)
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::ValueOutOfRange
            | Self::InvalidQuantity => StatusCode::BAD_REQUEST,
        }
    }
}
