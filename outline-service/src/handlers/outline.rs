use crate::error::GatewayError;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::Method,
    response::Response,
};

/// Accepts every method so non-POST requests get the gateway's own 405 body.
///
/// Body buffering failures (oversized payloads included) are rendered by the
/// gateway too, so they keep the JSON error envelope.
pub async fn get_outline(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match body {
        Ok(body) => state.gateway.handle(&method, &body).await,
        Err(_) if method != Method::POST => state.gateway.reject(GatewayError::InvalidMethod),
        Err(rejection) => state.gateway.reject(rejection.into()),
    }
}
