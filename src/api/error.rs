//! API error taxonomy
//!
//! Every failure is classified once, logged with its structured detail at
//! that point, and surfaced to callers as a fixed user-facing message only.

use reqwest::StatusCode;
use thiserror::Error;

/// Business code the backend uses for parameter validation failures.
const CODE_VALIDATION: i64 = 422;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response received
    #[error("Network request failed, check your connection")]
    Network,
    /// 401, or an envelope code saying the credentials are no longer good
    #[error("Session expired, please log in again")]
    Auth,
    #[error("Permission denied")]
    Permission,
    #[error("Requested resource does not exist")]
    NotFound,
    #[error("Internal server error")]
    Server,
    /// Non-zero envelope code; carries the server's own message
    #[error("{message}")]
    Business { code: i64, message: String },
    #[error("Request validation failed")]
    Validation,
    #[error("Unknown error")]
    Unknown,
}

impl ApiError {
    pub(crate) fn network(url: &str, err: &reqwest::Error) -> Self {
        tracing::error!("network error for {}: {}", url, err);
        Self::Network
    }

    pub(crate) fn auth(url: &str, detail: &str) -> Self {
        tracing::warn!("authentication error for {}: {}", url, detail);
        Self::Auth
    }

    /// Classify an HTTP-level failure status. 401 is handled by the caller
    /// (refresh protocol) before this point.
    pub(crate) fn from_status(url: &str, status: StatusCode, message: Option<String>) -> Self {
        let detail = message.unwrap_or_else(|| status.to_string());
        match status.as_u16() {
            401 => Self::auth(url, &detail),
            403 => {
                tracing::warn!("permission denied for {}: {}", url, detail);
                Self::Permission
            }
            404 => {
                tracing::warn!("not found: {}: {}", url, detail);
                Self::NotFound
            }
            500..=599 => {
                tracing::error!("server error for {}: HTTP {} {}", url, status, detail);
                Self::Server
            }
            _ => {
                tracing::error!("unexpected HTTP {} for {}: {}", url, status, detail);
                Self::Unknown
            }
        }
    }

    /// Classify a non-zero envelope code from an otherwise successful
    /// response.
    pub(crate) fn business(url: &str, code: i64, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| "Business error".to_string());
        tracing::warn!("business error {} for {}: {}", code, url, message);
        match code {
            401 => Self::Auth,
            403 => Self::Permission,
            CODE_VALIDATION => Self::Validation,
            _ => Self::Business { code, message },
        }
    }

    pub(crate) fn unknown(url: &str, detail: &str) -> Self {
        tracing::error!("unclassified error for {}: {}", url, detail);
        Self::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(
            ApiError::from_status("u", StatusCode::FORBIDDEN, None),
            ApiError::Permission
        );
        assert_eq!(
            ApiError::from_status("u", StatusCode::NOT_FOUND, None),
            ApiError::NotFound
        );
        assert_eq!(
            ApiError::from_status("u", StatusCode::BAD_GATEWAY, None),
            ApiError::Server
        );
        assert_eq!(
            ApiError::from_status("u", StatusCode::IM_A_TEAPOT, None),
            ApiError::Unknown
        );
    }

    #[test]
    fn business_classification() {
        assert_eq!(ApiError::business("u", 401, None), ApiError::Auth);
        assert_eq!(ApiError::business("u", 422, None), ApiError::Validation);

        let err = ApiError::business("u", 1001, Some("username taken".to_string()));
        assert_eq!(err.to_string(), "username taken");
    }

    #[test]
    fn display_is_the_fixed_user_message() {
        assert_eq!(
            ApiError::Auth.to_string(),
            "Session expired, please log in again"
        );
        assert_eq!(
            ApiError::Network.to_string(),
            "Network request failed, check your connection"
        );
    }
}
