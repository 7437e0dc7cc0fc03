use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use super::request_id::RequestId;

pub const RESPONSE_TIME_HEADER: &str = "x-response-time";

/// Logs the outcome of every request and reports its duration in an
/// `X-Response-Time` header (milliseconds). Must run inside `request_id`.
pub async fn response_time(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(ToString::to_string)
        .unwrap_or_else(|| "unknown".to_string());

    let mut response = next.run(req).await;
    let duration_ms = start.elapsed().as_millis();
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(%request_id, %method, %uri, %status, duration_ms, "Request failed");
    } else if status.is_client_error() {
        tracing::warn!(%request_id, %method, %uri, %status, duration_ms, "Request rejected");
    } else {
        tracing::info!(%request_id, %method, %uri, %status, duration_ms, "Request completed");
    }

    if let Ok(value) = HeaderValue::from_str(&format!("{}ms", duration_ms)) {
        response.headers_mut().insert(RESPONSE_TIME_HEADER, value);
    }
    response
}
