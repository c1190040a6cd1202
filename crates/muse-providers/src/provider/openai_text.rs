use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{GenerationProvider, ProviderRequest, is_text_operation, output_key};
use crate::{error::ProviderError, prompts};

/// Default `OpenAI` API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model when none is configured
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// `OpenAI`-compatible chat-completions adapter for text operations
pub(crate) struct OpenAiTextProvider {
    name: String,
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl OpenAiTextProvider {
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

/// Wire format for the chat completions request
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    // Deterministic output keeps identical requests cache-equivalent
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Wire format for the chat completions response
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl GenerationProvider for OpenAiTextProvider {
    async fn invoke(&self, request: ProviderRequest<'_>) -> Result<Value, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let instruction = prompts::build_instruction(request.operation, request.payload, request.options);

        let wire_request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: instruction,
            }],
            temperature: 0.0,
        };

        tracing::debug!(provider = %self.name, operation = %request.operation, "sending text generation request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
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

        let wire_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse completion: {e}")))?;

        let content = wire_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("completion had no content".to_owned()))?;

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
