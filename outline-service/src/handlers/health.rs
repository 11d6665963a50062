use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use service_core::error::AppError;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "outline-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness probe: not ready until an API key is configured.
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    if !state.gateway.has_credential() {
        tracing::warn!("Readiness check failed: Gemini API key not configured");
        return Err(AppError::ServiceUnavailable(
            "Gemini API key not configured".to_string(),
        ));
    }

    Ok(Json(json!({ "status": "ready" })))
}
