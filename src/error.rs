// Client-side error types
use thiserror::Error;

use crate::session::storage::StorageError;
use crate::types::Action;

/// Failure of a single call against the admin REST backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("{0}")]
    BadRequest(String),

    // 401 Unauthorized
    #[error("{0}")]
    Unauthorized(String),

    // 403 Forbidden
    #[error("{0}")]
    Forbidden(String),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 422 Unprocessable Entity
    #[error("{0}")]
    UnprocessableEntity(String),

    // 5xx
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    // Anything else the backend answered with
    #[error("unexpected status {status}: {message}")]
    Unexpected { status: u16, message: String },

    // Connection refused, DNS, TLS, timeout
    #[error("network error: {0}")]
    Network(String),

    // Body did not match the expected shape
    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Map a non-success HTTP status and its message to an error variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            422 => ApiError::UnprocessableEntity(message),
            500..=599 => ApiError::Server { status, message },
            _ => ApiError::Unexpected { status, message },
        }
    }

    /// HTTP status the backend answered with, if it answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest(_) => Some(400),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::UnprocessableEntity(_) => Some(422),
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Unexpected { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) | ApiError::InvalidUrl(_) => None,
        }
    }

    /// Error code for output and logs
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::UnprocessableEntity(_) => "UNPROCESSABLE_ENTITY",
            ApiError::Server { .. } => "SERVER_ERROR",
            ApiError::Unexpected { .. } => "UNEXPECTED_STATUS",
            ApiError::Network(_) => "NETWORK_ERROR",
            ApiError::Decode(_) => "DECODE_ERROR",
            ApiError::InvalidUrl(_) => "INVALID_URL",
        }
    }

    /// Message without the status prefix
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(message)
            | ApiError::Unauthorized(message)
            | ApiError::Forbidden(message)
            | ApiError::NotFound(message)
            | ApiError::UnprocessableEntity(message)
            | ApiError::Network(message)
            | ApiError::Decode(message)
            | ApiError::InvalidUrl(message) => message,
            ApiError::Server { message, .. } | ApiError::Unexpected { message, .. } => message,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ApiError::Decode(message.into())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Access-control outcomes shared by the session store, route guard and menu builder
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("authentication required")]
    AuthenticationRequired,

    #[error("access denied for module '{module_key}' ({action})")]
    AuthorizationDenied { module_key: String, action: Action },

    #[error("login rejected: {0}")]
    LoginRejected(#[source] ApiError),

    #[error("identity fetch failed: {0}")]
    IdentityFetchFailed(#[source] ApiError),

    #[error("module list fetch failed: {0}")]
    ModuleListFetchFailed(#[source] ApiError),

    #[error("token storage error: {0}")]
    TokenStorage(#[from] StorageError),
}
