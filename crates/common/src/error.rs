//! Error types for murmur.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Message returned to clients for every 5xx error.
const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    #[error("Validation error on {field}: {message}")]
    Validation {
        /// Name of the offending input field.
        field: String,
        /// Human readable description.
        message: String,
    },

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Build a validation error for a single field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) | Self::PostNotFound(_) | Self::CommentNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Validation { .. } => StatusCode::BAD_REQUEST,

            // 5xx Server Errors
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::PostNotFound(_) => "POST_NOT_FOUND",
            Self::CommentNotFound(_) => "COMMENT_NOT_FOUND",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Message shown to the client. Server errors never leak their cause.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound(msg) => msg.clone(),
            Self::PostNotFound(_) => "Post not found".to_string(),
            Self::CommentNotFound(_) => "Comment not found".to_string(),
            Self::Validation { message, .. } => message.clone(),
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                INTERNAL_MESSAGE.to_string()
            }
        }
    }

    /// JSON body rendered for this error.
    #[must_use]
    pub fn body(&self) -> Value {
        let mut body = json!({
            "code": self.error_code(),
            "message": self.public_message(),
        });
        if let Self::Validation { field, .. } = self {
            body["field"] = Value::String(field.clone());
        }
        body
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        (status, Json(self.body())).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        // Report the alphabetically first failing field so responses are stable.
        let first = err
            .field_errors()
            .into_iter()
            .map(|(field, errors)| (camel_case(&field), errors.first().cloned()))
            .min_by(|a, b| a.0.cmp(&b.0));

        match first {
            Some((field, Some(error))) => {
                let message = error
                    .message
                    .map_or_else(|| format!("Invalid value for {field}"), |m| m.to_string());
                Self::Validation { field, message }
            }
            Some((field, None)) => Self::Validation {
                message: format!("Invalid value for {field}"),
                field,
            },
            None => Self::validation("body", err.to_string()),
        }
    }
}

/// `gif_url` -> `gifUrl`, matching the JSON field names clients send.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Input {
        #[validate(length(max = 3, message = "Too long"))]
        name: String,
        #[validate(range(min = 1, max = 5))]
        score: i32,
    }

    #[derive(Validate)]
    struct SnakeInput {
        #[validate(length(min = 1))]
        gif_url: String,
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::PostNotFound("p1".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::validation("content", "bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_body_includes_field() {
        let body = AppError::validation("content", "Content is required").body();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Content is required");
        assert_eq!(body["field"], "content");
    }

    #[test]
    fn test_server_error_hides_details() {
        let body = AppError::Database("password authentication failed".into()).body();
        assert_eq!(body["message"], INTERNAL_MESSAGE);
        assert!(body.get("field").is_none());
    }

    #[test]
    fn test_from_validation_errors_picks_first_field() {
        let input = Input {
            name: "toolong".to_string(),
            score: 9,
        };
        let err: AppError = input.validate().unwrap_err().into();
        match err {
            AppError::Validation { field, message } => {
                assert_eq!(field, "name");
                assert_eq!(message, "Too long");
            }
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_validation_errors_default_message() {
        let input = Input {
            name: "ok".to_string(),
            score: 0,
        };
        let err: AppError = input.validate().unwrap_err().into();
        match err {
            AppError::Validation { field, message } => {
                assert_eq!(field, "score");
                assert_eq!(message, "Invalid value for score");
            }
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_validation_errors_uses_json_field_names() {
        let input = SnakeInput {
            gif_url: String::new(),
        };
        let err: AppError = input.validate().unwrap_err().into();
        match err {
            AppError::Validation { field, .. } => assert_eq!(field, "gifUrl"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }
}
