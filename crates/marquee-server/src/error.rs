//! Handler-level error type.
//!
//! Translates the component error taxonomies into HTTP responses with the
//! shared JSON error envelope. Handlers only ever construct or forward these
//! variants; raw transport errors never reach this layer.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use marquee_auth::AuthError;
use marquee_storage::StoreError;

/// Errors returned by request handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Authentication/authorization failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Catalog storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The referenced record does not exist. Also covers un-decodable
    /// public identifiers, which are indistinguishable from missing records.
    #[error("{entity} not found")]
    NotFound {
        /// Entity name for the response body.
        entity: &'static str,
    },

    /// The request body failed validation.
    #[error("invalid request: {message}")]
    Invalid {
        /// Description of the validation failure.
        message: String,
    },
}

impl ApiError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    /// Creates a new `Invalid` error.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Type alias for handler results.
pub type ApiResult<T> = Result<T, ApiError>;

fn json_error(status: StatusCode, code: &str, message: &str) -> Response {
    let body = json!({
        "error": {
            "code": code,
            "message": message,
        }
    });
    (status, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Auth(err) => err.into_response(),
            Self::Store(err) => match &err {
                StoreError::NotFound { .. } => {
                    json_error(StatusCode::NOT_FOUND, "not_found", &err.to_string())
                }
                StoreError::Conflict { .. } => {
                    json_error(StatusCode::CONFLICT, "conflict", &err.to_string())
                }
                StoreError::Unavailable { .. } => json_error(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "unavailable",
                    &err.to_string(),
                ),
                StoreError::Internal { .. } => {
                    tracing::error!(error = %err, "storage failure");
                    json_error(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal",
                        "internal server error",
                    )
                }
            },
            Self::NotFound { entity } => json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                &format!("{entity} not found"),
            ),
            Self::Invalid { message } => {
                json_error(StatusCode::BAD_REQUEST, "invalid_request", &message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_not_found_response() {
        let res = ApiError::not_found("Cinema").into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "not_found");
        assert_eq!(json["error"]["message"], "Cinema not found");
    }

    #[tokio::test]
    async fn test_invalid_response() {
        let res = ApiError::invalid("capacity must be > 0").into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_store_internal_is_masked() {
        let res = ApiError::Store(StoreError::internal("connection reset")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        // Transport detail stays in the logs, not the response.
        assert_eq!(json["error"]["message"], "internal server error");
    }

    #[tokio::test]
    async fn test_auth_error_delegates() {
        let res = ApiError::Auth(AuthError::forbidden("nope")).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}
