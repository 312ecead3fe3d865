//! Failure taxonomy shared by the invoker, the tasks and the HTTP layer.

use thiserror::Error;

/// Why a task could not produce a result.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The caller supplied insufficient or malformed input.
    #[error("{0}")]
    InvalidRequest(String),
    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The completion service could not be reached or answered with an error.
    #[error("Completion service unavailable: {0}")]
    UpstreamUnavailable(String),
    /// The completion service answered with something we cannot trust.
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}

impl TaskError {
    /// Machine-readable kind, used as the `error` field of HTTP bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::NotFound(_) => "not_found",
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(TaskError::InvalidRequest("x".into()).kind(), "invalid_request");
        assert_eq!(TaskError::NotFound("x".into()).kind(), "not_found");
        assert_eq!(
            TaskError::MalformedResponse("x".into()).kind(),
            "malformed_response"
        );
    }

    #[test]
    fn test_display_keeps_client_messages_verbatim() {
        let err = TaskError::InvalidRequest("Query is required".into());
        assert_eq!(err.to_string(), "Query is required");
    }
}
