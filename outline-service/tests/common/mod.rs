#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use outline_service::config::{GenerationMode, Settings};
use outline_service::services::providers::gemini::{GeminiClient, GeminiConfig};
use outline_service::startup::{build_router, build_state};
use secrecy::Secret;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_MODEL: &str = "gemini-test";

/// Path the mock upstream serves `generateContent` on.
pub fn generate_path() -> String {
    format!("/models/{}:generateContent", TEST_MODEL)
}

pub fn test_settings(api_base: &str, api_key: Option<&str>, mode: GenerationMode) -> Settings {
    let mut settings = Settings::default();
    settings.server.host = "127.0.0.1".to_string();
    settings.server.port = 0;
    settings.gemini.api_base = api_base.to_string();
    settings.gemini.model = TEST_MODEL.to_string();
    settings.gemini.api_key = api_key.map(|key| Secret::new(key.to_string()));
    settings.gemini.generation_mode = mode;
    settings
}

/// Router wired to a real Gemini client pointed at `api_base`.
pub fn test_router(settings: &Settings) -> Router {
    let client = Arc::new(GeminiClient::new(GeminiConfig {
        api_base: settings.gemini.api_base.clone(),
        model: settings.gemini.model.clone(),
    }));
    build_router(build_state(settings, client), &settings.cors)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn error_message(&self) -> String {
        self.json()["error"]["message"]
            .as_str()
            .expect("missing error.message")
            .to_string()
    }
}

pub async fn send(router: &Router, method: Method, uri: &str, body: &str) -> TestResponse {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse {
        status,
        content_type,
        body,
    }
}

pub async fn post_outline(router: &Router, body: &str) -> TestResponse {
    send(router, Method::POST, "/api/outline", body).await
}
