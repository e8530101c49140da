//! Client error types

use shared::error::{AppError, ErrorCode, PosError};
use shared::models::SessionInvalidReason;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 服务端返回的业务错误
    #[error("[{code}] {message}")]
    Api {
        code: ErrorCode,
        message: String,
        /// Machine-readable guard reason (`details.reason`)
        reason: Option<String>,
    },

    /// The call did not finish in time; it may or may not have been applied.
    /// Re-validate before retrying.
    #[error("{operation} did not finish in time; outcome is uncertain")]
    Uncertain { operation: String },

    /// The presented session is permanently invalid
    #[error("{}", .0.message())]
    SessionInvalid(SessionInvalidReason),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api { code, .. } => Some(*code),
            ClientError::Http(_) => Some(ErrorCode::NetworkError),
            ClientError::Uncertain { .. } => Some(ErrorCode::TimeoutError),
            ClientError::SessionInvalid(_) => Some(ErrorCode::SessionInvalid),
            _ => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ClientError::Api { reason, .. } => reason.as_deref(),
            ClientError::Uncertain { .. } => Some("uncertain"),
            ClientError::SessionInvalid(reason) => Some(reason.as_str()),
            _ => None,
        }
    }

    pub fn is_uncertain(&self) -> bool {
        matches!(self, ClientError::Uncertain { .. })
    }

    pub(crate) fn uncertain(operation: impl Into<String>) -> Self {
        ClientError::Uncertain {
            operation: operation.into(),
        }
    }
}

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        let reason = err.reason().map(str::to_string);
        if err.code == ErrorCode::SessionInvalid
            && let Some(parsed) = reason
                .as_deref()
                .and_then(|r| serde_json::from_value(serde_json::Value::from(r)).ok())
        {
            return ClientError::SessionInvalid(parsed);
        }
        ClientError::Api {
            code: err.code,
            message: err.message,
            reason,
        }
    }
}

impl From<PosError> for ClientError {
    fn from(err: PosError) -> Self {
        match err {
            PosError::SessionInvalid(reason) => ClientError::SessionInvalid(reason),
            PosError::NetworkTimeout { operation } => ClientError::Uncertain { operation },
            other => ClientError::Api {
                code: other.code(),
                reason: Some(other.reason_key().to_string()),
                message: other.to_string(),
            },
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
