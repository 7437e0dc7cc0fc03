use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

/// JSON body extractor whose rejections use the service's error body shape.
pub struct AppJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                let (status, message) = match rejection {
                    JsonRejection::JsonDataError(err) => {
                        (StatusCode::BAD_REQUEST, format!("Invalid JSON data: {}", err))
                    }
                    JsonRejection::JsonSyntaxError(err) => (
                        StatusCode::BAD_REQUEST,
                        format!("Failed to parse the request body as JSON: {}", err),
                    ),
                    JsonRejection::MissingJsonContentType(err) => (
                        StatusCode::UNSUPPORTED_MEDIA_TYPE,
                        format!("Missing JSON Content-Type: {}", err),
                    ),
                    JsonRejection::BytesRejection(err) => (
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read request body: {}", err),
                    ),
                    _ => (StatusCode::BAD_REQUEST, "Failed to parse JSON".to_string()),
                };
                tracing::debug!(%status, %message, "Rejected request body");

                let body = json!({
                    "statusCode": status.as_u16(),
                    "message": message,
                    "error": status.canonical_reason().unwrap_or("Bad Request"),
                });
                Err((status, Json(body)).into_response())
            }
        }
    }
}
