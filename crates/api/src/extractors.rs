//! Request extractors.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use murmur_common::{AppError, SESSION_HEADER, SessionId};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Anonymous session taken from the `x-user-session` header.
///
/// Rejects with a 400 naming the header when it is missing, blank, too long
/// or not valid text.
#[derive(Debug, Clone)]
pub struct Session(pub SessionId);

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SESSION_HEADER)
            .ok_or_else(|| AppError::validation(SESSION_HEADER, "User session required"))?;

        let raw = value.to_str().map_err(|_| {
            AppError::validation(SESSION_HEADER, "User session contains invalid characters")
        })?;

        SessionId::parse(raw).map(Self)
    }
}

/// JSON body that has been deserialized and validated.
///
/// Malformed bodies become a validation error on `body` instead of axum's
/// default 422, and field-level failures name the offending field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation("body", rejection.body_text()))?;

        value.validate()?;
        Ok(Self(value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::{self, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Input {
        #[validate(range(min = 1, max = 5))]
        rating: i32,
    }

    async fn session_from(header_value: Option<&str>) -> Result<Session, AppError> {
        let mut builder = http::Request::builder().uri("/");
        if let Some(v) = header_value {
            builder = builder.header(SESSION_HEADER, v);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        Session::from_request_parts(&mut parts, &()).await
    }

    async fn json_from(body: &str) -> Result<ValidatedJson<Input>, AppError> {
        let req = http::Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body.to_string()))
            .unwrap();
        ValidatedJson::<Input>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_session_present() {
        let Session(session) = session_from(Some("abc-123")).await.unwrap();
        assert_eq!(session.as_str(), "abc-123");
    }

    #[tokio::test]
    async fn test_session_missing() {
        match session_from(None).await {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, SESSION_HEADER),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_session_blank() {
        assert!(session_from(Some("   ")).await.is_err());
    }

    #[tokio::test]
    async fn test_validated_json_ok() {
        let ValidatedJson(input) = json_from(r#"{"rating": 4}"#).await.unwrap();
        assert_eq!(input.rating, 4);
    }

    #[tokio::test]
    async fn test_validated_json_malformed() {
        match json_from("{not json").await {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "body"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_validated_json_out_of_range() {
        match json_from(r#"{"rating": 7}"#).await {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "rating"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }
}
