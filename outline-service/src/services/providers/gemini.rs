//! Gemini `generateContent` client.

use super::{GenerationClient, GenerationOptions, ProviderError, UpstreamReply};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use service_core::observability::TracedClientExt;
use std::error::Error;

/// Output MIME type requested in both generation modes.
const JSON_MIME_TYPE: &str = "application/json";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_base: String,
    pub model: String,
}

/// Gemini client. Transport defaults apply: no retries, no explicit timeout.
#[derive(Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// `generateContent` URL for the configured model, without the key.
    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(
        &self,
        credential: &Secret<String>,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<UpstreamReply, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: JSON_MIME_TYPE,
                response_schema: options.response_schema.as_ref(),
            },
        };

        let url = self.api_url();

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            schema_constrained = options.response_schema.is_some(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .traced_post(&url)
            .query(&[("key", credential.expose_secret().as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(describe(e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::ResponseRead(describe(e)))?;

        tracing::debug!(
            status = status.as_u16(),
            body_len = body.len(),
            "Received Gemini API response"
        );

        Ok(UpstreamReply { status, body })
    }
}

/// reqwest's summary plus the innermost cause, e.g. "connection refused".
///
/// The URL is stripped because it carries the `key` query parameter.
fn describe(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut root: Option<&(dyn Error + 'static)> = None;
    let mut source = err.source();
    while let Some(cause) = source {
        root = Some(cause);
        source = cause.source();
    }

    match root {
        Some(cause) => format!("{}: {}", err, cause),
        None => err.to_string(),
    }
}

// ============================================================================
// Gemini API Request Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a serde_json::Value>,
}
