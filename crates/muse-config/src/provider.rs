use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// A configured generation provider
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Adapter implementation to use
    #[serde(rename = "type")]
    pub provider_type: ProviderType,
    /// API key for the upstream service
    pub api_key: Option<SecretString>,
    /// Override for the provider's default API base URL
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Model to request (e.g. "gpt-4o-mini", "dall-e-3")
    #[serde(default)]
    pub model: Option<String>,
}

/// Known provider adapter implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    /// OpenAI-compatible chat completions (text operations)
    OpenaiText,
    /// Anthropic messages API (text operations)
    AnthropicText,
    /// OpenAI-compatible image generation
    OpenaiImage,
}
