//! JSON request bodies that fail as `ApiError` instead of axum's plain-text
//! rejections.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Drop-in for `Json<T>` on request bodies.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                Err(ApiError::Validation(rejection_message(&rejection).to_string()))
            }
        }
    }
}

fn rejection_message(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => "Request body must be JSON",
        JsonRejection::JsonSyntaxError(_) => "Malformed JSON body",
        JsonRejection::JsonDataError(_) => "Invalid request body",
        _ => "Unreadable request body",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, response::IntoResponse};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Toggle {
        status: String,
    }

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<Toggle, ApiError> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        let req = builder.body(Body::from(body)).unwrap();
        JsonBody::<Toggle>::from_request(req, &()).await.map(|b| b.0)
    }

    async fn message(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let toggle = extract(Some("application/json"), r#"{"status":"ON"}"#)
            .await
            .unwrap();
        assert_eq!(toggle.status, "ON");
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_validation_error() {
        let err = extract(Some("application/json"), r#"{"status":1}"#).await.unwrap_err();
        let (status, body) = message(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_missing_content_type_is_validation_error() {
        let err = extract(None, "").await.unwrap_err();
        let (status, body) = message(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Request body must be JSON");
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let err = extract(Some("application/json"), "{\"status\":").await.unwrap_err();
        let (status, body) = message(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Malformed JSON body");
    }
}
