use thiserror::Error;

/// Failures surfaced by the API client and session operations.
///
/// Every variant has already produced its user-facing notification by the
/// time it reaches the caller; callers decide whether to additionally react
/// (e.g. keep a form open on `Validation`).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized: {}", detail.as_deref().unwrap_or("authentication required"))]
    Unauthorized { detail: Option<String> },

    #[error("forbidden: {}", detail.as_deref().unwrap_or("insufficient permissions"))]
    Forbidden { detail: Option<String> },

    #[error("validation failed: {message}")]
    Validation { message: String },

    #[error("server error ({status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Server { status: u16, detail: Option<String> },

    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    #[error("token refresh failed: {0}")]
    RefreshFailed(#[source] Box<ApiError>),

    #[error("invalid form data: {0}")]
    InvalidForm(#[from] validator::ValidationErrors),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ApiError {
    /// HTTP status this error was mapped from, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::Validation { .. } => Some(400),
            ApiError::Server { status, .. } => Some(*status),
            ApiError::RefreshFailed(inner) => inner.status(),
            _ => None,
        }
    }

    /// True when the session was torn down as part of handling this error.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. } | ApiError::RefreshFailed(_)
        )
    }
}
