use crate::constants::FALLBACK_ERROR_MESSAGE;
use reqwest::StatusCode;
use std::fmt::{Display, Formatter};
use std::{fmt, io};

/// Error surfaced by the authenticated gateway and the services built on it.
///
/// Every variant that crosses the interceptor carries a single human-readable
/// message: the backend-supplied `message` field when one was present, the
/// generic fallback otherwise.
#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error),
    Io(io::Error),
    Json(serde_json::Error),
    /// Non-2xx backend response other than a 401.
    Backend { status: StatusCode, message: String },
    /// A 401 that cannot be recovered by refreshing (wrong sentinel, or no
    /// refresh token available).
    Unauthorized { message: String },
    /// The refresh call itself failed; the session is gone.
    RefreshFailed { message: String },
}

impl ApiError {
    /// The normalized message shown to callers.
    pub fn message(&self) -> String {
        match self {
            ApiError::Network(e) => e.to_string(),
            ApiError::Io(e) => e.to_string(),
            ApiError::Json(e) => e.to_string(),
            ApiError::Backend { message, .. }
            | ApiError::Unauthorized { message }
            | ApiError::RefreshFailed { message } => message.clone(),
        }
    }

    pub(crate) fn backend(status: StatusCode, message: Option<String>) -> Self {
        ApiError::Backend {
            status,
            message: message.unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string()),
        }
    }

    pub(crate) fn unauthorized(message: Option<String>) -> Self {
        ApiError::Unauthorized {
            message: message.unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string()),
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e) => write!(f, "network error: {e}"),
            ApiError::Io(e) => write!(f, "io error: {e}"),
            ApiError::Json(e) => write!(f, "json error: {e}"),
            ApiError::Backend { status, message } => {
                write!(f, "backend error ({status}): {message}")
            }
            ApiError::Unauthorized { message } => write!(f, "unauthorized: {message}"),
            ApiError::RefreshFailed { message } => write!(f, "token refresh failed: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Network(e)
    }
}
impl From<io::Error> for ApiError {
    fn from(e: io::Error) -> Self {
        ApiError::Io(e)
    }
}
impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Json(e)
    }
}
