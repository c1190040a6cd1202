use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{GenerationProvider, ProviderRequest, is_text_operation, output_key};
use crate::{error::ProviderError, prompts};

/// Default Anthropic API base URL
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
/// Default model when none is configured
const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";
/// API version header required by the messages endpoint
const API_VERSION: &str = "2023-06-01";

/// Anthropic messages-API adapter for text operations
pub(crate) struct AnthropicTextProvider {
    name: String,
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl AnthropicTextProvider {
    pub fn new(name: String, api_key: SecretString, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            name,
            client: Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
        }
    }
}

/// Wire format for the messages request
#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
    temperature: f64,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

/// Wire format for the messages response
#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[async_trait]
impl GenerationProvider for AnthropicTextProvider {
    async fn invoke(&self, request: ProviderRequest<'_>) -> Result<Value, ProviderError> {
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let instruction = prompts::build_instruction(request.operation, request.payload, request.options);

        let wire_request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: 1024,
            messages: vec![Message {
                role: "user",
                content: instruction,
            }],
            temperature: 0.0,
        };

        tracing::debug!(provider = %self.name, operation = %request.operation, "sending text generation request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(provider = %self.name, error = %e, "text generation request failed");
                ProviderError::from_transport(&e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_owned());
            tracing::warn!(provider = %self.name, status = %status, "text generation API error");
            return Err(ProviderError::from_status(status.as_u16(), body));
        }

        let wire_response: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse message: {e}")))?;

        let content = wire_response
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| ProviderError::InvalidResponse("message had no text block".to_owned()))?;

        Ok(serde_json::json!({
            output_key(request.operation): content,
            "model": self.model,
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, operation: muse_core::Operation) -> bool {
        is_text_operation(operation)
    }
}
