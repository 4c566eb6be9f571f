use thiserror::Error;

use super::BackendCall;

/// Why a backend call did not produce its result
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Any non-success status without a more specific mapping
    #[error("Backend error: {0}")]
    Api(String),

    #[error("Malformed response: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rejected by backend: {0}")]
    BadRequest(String),

    /// Failure configured on the fixture backend for this call
    #[error("{0:?} failed")]
    Injected(BackendCall),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injected_failure_names_the_call() {
        let err = ApiError::Injected(BackendCall::MarkConversationRead);
        assert_eq!(err.to_string(), "MarkConversationRead failed");
    }

    #[test]
    fn test_status_errors_keep_backend_text() {
        assert_eq!(
            ApiError::BadRequest("content too long".to_string()).to_string(),
            "Rejected by backend: content too long"
        );
    }
}
