use async_trait::async_trait;
use muse_core::Operation;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{GenerationProvider, ProviderRequest};
use crate::{error::ProviderError, prompts};

/// Default `OpenAI` API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model when none is configured
const DEFAULT_MODEL: &str = "dall-e-3";

/// `OpenAI`-compatible image generation adapter
///
/// Serves both fresh images and variations; variations re-prompt the
/// generations endpoint with `n > 1` rather than the legacy variations
/// endpoint, which requires a source image upload.
pub(crate) struct OpenAiImageProvider {
    name: String,
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl OpenAiImageProvider {
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

/// Wire format for the image generation request
#[derive(Serialize)]
struct ImageRequest {
    prompt: String,
    model: String,
    n: u32,
    size: String,
    quality: String,
    response_format: &'static str,
}

/// Wire format for the image generation response
#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
    revised_prompt: Option<String>,
}

#[async_trait]
impl GenerationProvider for OpenAiImageProvider {
    async fn invoke(&self, request: ProviderRequest<'_>) -> Result<Value, ProviderError> {
        let url = format!("{}/images/generations", self.base_url.trim_end_matches('/'));
        let prompt = prompts::build_image_prompt(request.payload, request.options);

        let n = if request.operation == Operation::ImageVariations {
            request.options.variation_count.unwrap_or(3).clamp(1, 10)
        } else {
            1
        };

        let wire_request = ImageRequest {
            prompt,
            model: self.model.clone(),
            n,
            size: "1024x1024".to_owned(),
            quality: request.options.quality.clone().unwrap_or_else(|| "standard".to_owned()),
            response_format: "url",
        };

        tracing::debug!(provider = %self.name, operation = %request.operation, n, "sending image generation request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(provider = %self.name, error = %e, "image generation request failed");
                ProviderError::from_transport(&e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_owned());
            tracing::warn!(provider = %self.name, status = %status, "image generation API error");
            return Err(ProviderError::from_status(status.as_u16(), body));
        }

        let wire_response: ImageResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse image response: {e}")))?;

        let urls: Vec<String> = wire_response.data.iter().filter_map(|entry| entry.url.clone()).collect();
        if urls.is_empty() {
            return Err(ProviderError::InvalidResponse("image response had no URLs".to_owned()));
        }

        let revised = wire_response.data.into_iter().find_map(|entry| entry.revised_prompt);

        let mut output = serde_json::json!({
            "images": urls,
            "model": self.model,
        });
        if let Some(revised_prompt) = revised {
            output["revised_prompt"] = Value::String(revised_prompt);
        }

        Ok(output)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, operation: Operation) -> bool {
        matches!(operation, Operation::Image | Operation::ImageVariations)
    }
}
