//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// `201 Created` with a JSON body.
#[derive(Debug)]
pub struct Created<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

/// Body returned after removing a like.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlikeResponse {
    /// Always `true`; failures are reported as errors.
    pub success: bool,
    /// Likes left on the subject.
    pub likes_count: i32,
}

impl UnlikeResponse {
    /// Successful unlike leaving `likes_count` likes on the subject.
    #[must_use]
    pub const fn new(likes_count: i32) -> Self {
        Self {
            success: true,
            likes_count,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_created_status() {
        let response = Created(serde_json::json!({"id": "p1"})).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_unlike_response_shape() {
        let json = serde_json::to_value(UnlikeResponse::new(0)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "likesCount": 0}));
    }
}
