//! API error envelope: `{"error": {"message", "type", "code"?}}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error categories exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    NotFoundError,
    ConflictError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::ConflictError => write!(f, "conflict_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    code: None,
                },
            },
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, ApiErrorType::ConflictError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.reason();

        match &err {
            DomainError::InvalidRequest { .. } => Self::bad_request(message),
            DomainError::NotFound { .. } => Self::not_found(message),
            DomainError::InvalidFormat { .. } => {
                Self::bad_request(message).with_code("invalid_format")
            }
            DomainError::DuplicateKey { .. } => Self::conflict(message).with_code("duplicate_key"),
            DomainError::DuplicateExternalId { .. } => {
                Self::conflict(message).with_code("duplicate_external_id")
            }
            DomainError::InternalInvariant { .. } => {
                Self::internal(message).with_code("internal_invariant")
            }
            DomainError::Storage { .. } => Self::internal(message).with_code("storage_error"),
            DomainError::Configuration { .. } => {
                Self::internal(message).with_code("configuration_error")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_status_mapping() {
        let cases = [
            (DomainError::invalid_request("total must be positive"), StatusCode::BAD_REQUEST),
            (DomainError::invalid_format("bad json"), StatusCode::BAD_REQUEST),
            (DomainError::not_found("missing"), StatusCode::NOT_FOUND),
            (DomainError::duplicate_key("u1"), StatusCode::CONFLICT),
            (DomainError::duplicate_external_id("u1", "q1"), StatusCode::CONFLICT),
            (DomainError::internal_invariant("count"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::storage("down"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::configuration("template"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain_err, status) in cases {
            let api_err: ApiError = domain_err.into();
            assert_eq!(api_err.status, status);
        }
    }

    #[test]
    fn test_message_has_no_variant_prefix() {
        let api_err: ApiError = DomainError::invalid_request("weights required").into();

        assert_eq!(api_err.response.error.message, "weights required");
        assert_eq!(api_err.response.error.error_type, ApiErrorType::InvalidRequestError);
        assert_eq!(api_err.response.error.code, None);
    }

    #[test]
    fn test_error_serialization() {
        let api_err: ApiError = DomainError::duplicate_key("cs345-u1").into();
        let json = serde_json::to_value(&api_err.response).unwrap();

        assert_eq!(json["error"]["type"], "conflict_error");
        assert_eq!(json["error"]["code"], "duplicate_key");
        assert_eq!(json["error"]["message"], "Bank 'cs345-u1' already exists");
    }
}
