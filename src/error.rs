use serde_json::Value;
use thiserror::Error;

/// Code reported for failures that never produced an HTTP response.
pub const NETWORK_ERROR_CODE: i64 = -1;

/// HomeStay SDK error types
///
/// Every failed call resolves to one of these variants. Callers that only
/// need the normalized `{code, message}` pair can use [`code`](Self::code)
/// and [`message`](Self::message).
#[derive(Debug, Error)]
pub enum HomestayError {
    /// HTTP 200 with a nonzero envelope `code`.
    #[error("business error (code={code}): {message}")]
    Business {
        code: i64,
        message: String,
        /// The full envelope as returned by the backend.
        body: Value,
    },

    /// HTTP 401. The session has already been torn down when this is returned.
    #[error("unauthorized")]
    Unauthorized,

    /// HTTP 422 with the first validation message extracted from `detail`.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Any other non-success HTTP status.
    #[error("server error (status={status}): {message}")]
    Server { status: u16, message: String },

    /// No response was received.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A success payload did not match the expected shape.
    #[error("response decode error: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("login handshake error: {0}")]
    Login(String),
}

impl HomestayError {
    /// Normalized error code.
    ///
    /// Business errors carry the envelope code, HTTP failures the status,
    /// everything that happened client-side reports `-1`.
    pub fn code(&self) -> i64 {
        match self {
            HomestayError::Business { code, .. } => *code,
            HomestayError::Unauthorized => 401,
            HomestayError::Validation { .. } => 422,
            HomestayError::Server { status, .. } => i64::from(*status),
            _ => NETWORK_ERROR_CODE,
        }
    }

    /// Normalized, user-presentable message.
    pub fn message(&self) -> String {
        match self {
            HomestayError::Business { message, .. } => message.clone(),
            HomestayError::Unauthorized => "未授权".to_string(),
            HomestayError::Validation { message } => message.clone(),
            HomestayError::Server { message, .. } => message.clone(),
            HomestayError::Network(_) => "网络错误".to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, HomestayError::Unauthorized)
    }
}
