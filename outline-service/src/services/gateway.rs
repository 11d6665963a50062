//! The outline gateway: validate, render, forward once, map the outcome.

use crate::config::GenerationMode;
use crate::error::{GatewayError, UNKNOWN_UPSTREAM_ERROR_MESSAGE};
use crate::models::OutlineRequest;
use crate::services::prompt::PromptTemplate;
use crate::services::providers::{GenerationClient, GenerationOptions};
use crate::services::schema::outline_response_schema;
use axum::body::Bytes;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use metrics::{counter, histogram};
use secrecy::Secret;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use validator::Validate;

const USER_INPUT_REQUIRED: &str = "User input is required.";

/// Forwards outline requests to the upstream generation endpoint.
///
/// Holds only read-only state, so one instance serves concurrent requests.
pub struct OutlineGateway {
    credential: Option<Secret<String>>,
    template: PromptTemplate,
    options: GenerationOptions,
    client: Arc<dyn GenerationClient>,
}

impl OutlineGateway {
    pub fn new(
        credential: Option<Secret<String>>,
        template: PromptTemplate,
        mode: GenerationMode,
        client: Arc<dyn GenerationClient>,
    ) -> Self {
        let options = GenerationOptions {
            response_schema: match mode {
                GenerationMode::Json => None,
                GenerationMode::Schema => Some(outline_response_schema()),
            },
        };

        Self {
            credential,
            template,
            options,
            client,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Handle one inbound request end to end.
    pub async fn handle(&self, method: &Method, body: &[u8]) -> Response {
        match self.forward(method, body).await {
            Ok(payload) => {
                counter!("outline_requests_total", "outcome" => "success").increment(1);
                (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, "application/json")],
                    payload,
                )
                    .into_response()
            }
            Err(err) => self.reject(err),
        }
    }

    /// Render a failure raised before the gateway saw the body.
    pub fn reject(&self, err: GatewayError) -> Response {
        counter!("outline_requests_total", "outcome" => err.outcome()).increment(1);
        err.log();
        err.into_response()
    }

    /// Returns the upstream success body untouched.
    async fn forward(&self, method: &Method, body: &[u8]) -> Result<Bytes, GatewayError> {
        if *method != Method::POST {
            return Err(GatewayError::InvalidMethod);
        }

        let request = parse_request(body)?;

        let credential = self
            .credential
            .as_ref()
            .ok_or(GatewayError::MissingCredential)?;

        let prompt = self.template.render(&request.user_input);

        tracing::info!(
            input_len = request.user_input.len(),
            schema_constrained = self.options.response_schema.is_some(),
            "Forwarding outline request"
        );

        let started = Instant::now();
        let reply = self
            .client
            .generate(credential, &prompt, &self.options)
            .await;
        histogram!("outline_upstream_duration_seconds").record(started.elapsed().as_secs_f64());
        let reply = reply?;

        if !reply.status.is_success() {
            return Err(GatewayError::UpstreamFailure {
                status: reply.status,
                message: upstream_error_message(&reply.body),
            });
        }

        Ok(reply.body)
    }
}

fn parse_request(body: &[u8]) -> Result<OutlineRequest, GatewayError> {
    let request: OutlineRequest = serde_json::from_slice(body).map_err(|e| {
        if e.is_data() {
            GatewayError::InvalidBody(USER_INPUT_REQUIRED.to_string())
        } else {
            GatewayError::InvalidBody(format!("Request body must be valid JSON: {}", e))
        }
    })?;

    request
        .validate()
        .map_err(|_| GatewayError::InvalidBody(USER_INPUT_REQUIRED.to_string()))?;

    Ok(request)
}

#[derive(Deserialize)]
struct UpstreamErrorBody {
    error: Option<UpstreamErrorDetail>,
}

#[derive(Deserialize)]
struct UpstreamErrorDetail {
    message: Option<String>,
}

/// Most specific message an upstream error body offers, or a generic one.
fn upstream_error_message(body: &[u8]) -> String {
    serde_json::from_slice::<UpstreamErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .and_then(|detail| detail.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_UPSTREAM_ERROR_MESSAGE.to_string())
}
