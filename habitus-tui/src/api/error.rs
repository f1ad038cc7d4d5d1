use reqwest::StatusCode;
use thiserror::Error;

/// Message the API puts in the error body when the bearer token is rejected.
pub const INVALID_TOKEN_MESSAGE: &str = "Token is invalid";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Session expired or invalid. Run `habitus login` to authenticate.")]
    AuthExpired,
    #[error("Failed to call {call}: {source}")]
    Transport {
        call: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{call} returned {status}: {message}")]
    Status {
        call: String,
        status: StatusCode,
        message: String,
    },
    #[error("Failed to parse {call} response: {message}")]
    Decode { call: String, message: String },
    #[error("Invalid request: {0}")]
    Invalid(String),
}

impl ApiError {
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ApiError::AuthExpired)
    }

    /// Classify a non-success response.
    pub fn from_response(call: &str, status: StatusCode, message: Option<String>) -> Self {
        if status == StatusCode::UNAUTHORIZED
            || message.as_deref() == Some(INVALID_TOKEN_MESSAGE)
        {
            return ApiError::AuthExpired;
        }
        ApiError::Status {
            call: call.to_string(),
            status,
            message: message.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_status_is_auth_expired() {
        let err = ApiError::from_response("GET /habits", StatusCode::UNAUTHORIZED, None);
        assert!(err.is_auth_expired());
    }

    #[test]
    fn invalid_token_message_is_auth_expired_whatever_the_status() {
        let err = ApiError::from_response(
            "POST /focus-time",
            StatusCode::BAD_REQUEST,
            Some(INVALID_TOKEN_MESSAGE.to_string()),
        );
        assert!(err.is_auth_expired());
    }

    #[test]
    fn other_failures_keep_status_and_message() {
        let err = ApiError::from_response(
            "GET /focus-time",
            StatusCode::INTERNAL_SERVER_ERROR,
            None,
        );
        assert!(!err.is_auth_expired());
        assert_eq!(
            err.to_string(),
            "GET /focus-time returned 500 Internal Server Error: Internal Server Error"
        );
    }
}
