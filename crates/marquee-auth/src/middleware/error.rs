//! Error response handling for the authentication middleware.
//!
//! Implements `IntoResponse` for `AuthError` so gate failures and handler
//! errors render a consistent JSON error envelope.

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = error_details(&self);

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        let mut headers = HeaderMap::new();
        if status == StatusCode::UNAUTHORIZED {
            let www_auth = build_www_authenticate_header(code, &message);
            if let Ok(value) = HeaderValue::from_str(&www_auth) {
                headers.insert(header::WWW_AUTHENTICATE, value);
            }
        }

        (status, headers, Json(body)).into_response()
    }
}

/// Extracts response details from an `AuthError`.
///
/// Returns (HTTP status, machine-readable code, message).
fn error_details(error: &AuthError) -> (StatusCode, &'static str, String) {
    match error {
        AuthError::Unauthorized { message } => {
            (StatusCode::UNAUTHORIZED, "unauthorized", message.clone())
        }
        AuthError::InvalidToken { message } => {
            (StatusCode::UNAUTHORIZED, "invalid_token", message.clone())
        }
        AuthError::TokenExpired => (
            StatusCode::UNAUTHORIZED,
            "invalid_token",
            "Token has expired".to_string(),
        ),
        AuthError::UserNotFound => (
            StatusCode::NOT_FOUND,
            "not_found",
            "User not found".to_string(),
        ),
        AuthError::Forbidden { message } => {
            (StatusCode::FORBIDDEN, "access_denied", message.clone())
        }
        AuthError::Conflict { message } => (StatusCode::CONFLICT, "conflict", message.clone()),
        AuthError::Storage { message } => (
            StatusCode::SERVICE_UNAVAILABLE,
            "unavailable",
            message.clone(),
        ),
        AuthError::Internal { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            message.clone(),
        ),
    }
}

/// Builds the WWW-Authenticate header value for 401 responses.
fn build_www_authenticate_header(error: &str, description: &str) -> String {
    let escaped = description.replace('"', "\\\"");
    format!("Bearer realm=\"marquee\", error=\"{error}\", error_description=\"{escaped}\"")
}
