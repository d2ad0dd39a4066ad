//! Axum extractors for request bodies
//!
//! Axum's own `Json` rejection is plain text. Every endpoint here answers with
//! a JSON error body, so bodies go through [`JsonBody`] instead.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::core::error::{RequestError, VaultError};

/// JSON request body whose rejection is a [`VaultError`]
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_link(
///     JsonBody(draft): JsonBody<NewLink>,
/// ) -> VaultResult<Json<Link>> {
///     // draft is deserialized, not yet validated
/// }
/// ```
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = VaultError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> VaultError {
    RequestError::InvalidBody {
        message: rejection.body_text(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode, header::CONTENT_TYPE};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        id: String,
    }

    fn request(body: &'static str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .expect("failed to build request")
    }

    #[tokio::test]
    async fn test_valid_body() {
        let JsonBody(payload) = JsonBody::<Payload>::from_request(request(r#"{"id":"3"}"#), &())
            .await
            .expect("body should parse");
        assert_eq!(payload.id, "3");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let err = JsonBody::<Payload>::from_request(request("{"), &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let err = JsonBody::<Payload>::from_request(request("{}"), &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
