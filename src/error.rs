use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

pub const MISSING_API_KEY_MESSAGE: &str = "Server not configured: LINKUP_API_KEY is missing.";
pub const MISSING_QUERIES_MESSAGE: &str =
    "Field \"queries\" is required and must be a non-empty array.";
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON body.";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method Not Allowed. Use POST.";

/// Failure of a single call to the search provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Linkup API error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Linkup request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Linkup request failed: {0}")]
    Transport(String),

    #[error("Linkup returned an unreadable body: {0}")]
    InvalidBody(String),
}

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("{}", MISSING_API_KEY_MESSAGE)]
    Configuration,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AdapterError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdapterError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            AdapterError::Validation(_) => StatusCode::BAD_REQUEST,
            AdapterError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AdapterError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show an untrusted caller.
    pub fn public_message(&self) -> String {
        match self {
            AdapterError::Configuration => MISSING_API_KEY_MESSAGE.to_string(),
            AdapterError::Validation(message) => message.clone(),
            AdapterError::Upstream(_) => "Upstream search failed.".to_string(),
            AdapterError::Internal(_) => "Internal server error.".to_string(),
        }
    }
}

/// JSON error envelope: `{error, detail?}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> ErrorBody {
        ErrorBody {
            error: error.into(),
            detail: None,
        }
    }

    pub fn from_error(err: &AdapterError, expose_detail: bool) -> ErrorBody {
        ErrorBody {
            error: err.public_message(),
            detail: expose_detail.then(|| err.to_string()),
        }
    }
}
