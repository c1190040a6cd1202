use std::{collections::HashMap, sync::Arc};

use muse_config::{Config, ProviderConfig, ProviderType};
use muse_core::Operation;
use secrecy::SecretString;

use crate::{
    error::ProviderError,
    provider::{
        GenerationProvider, anthropic_text::AnthropicTextProvider, openai_image::OpenAiImageProvider,
        openai_text::OpenAiTextProvider,
    },
};

/// Resolved adapters, keyed by configured name
///
/// Built once at startup so a typo in a provider name fails the boot, not
/// an end-user request.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn GenerationProvider>>,
}

impl ProviderRegistry {
    /// Build every configured adapter
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let mut providers: HashMap<String, Arc<dyn GenerationProvider>> = HashMap::new();

        for (name, provider_config) in &config.providers {
            tracing::debug!(provider = %name, "initializing generation provider");
            providers.insert(name.clone(), build_adapter(name, provider_config)?);
        }

        tracing::debug!("provider registry initialized with {} adapter(s)", providers.len());
        Ok(Self { providers })
    }

    /// Registry wrapping pre-built adapters, used by tests
    pub fn from_adapters(adapters: Vec<Arc<dyn GenerationProvider>>) -> Self {
        let providers = adapters
            .into_iter()
            .map(|adapter| (adapter.name().to_owned(), adapter))
            .collect();
        Self { providers }
    }

    /// Look up an adapter by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn GenerationProvider>> {
        self.providers.get(name).cloned()
    }

    /// Names of adapters that can serve the operation
    pub fn supporting(&self, operation: Operation) -> Vec<String> {
        let mut names: Vec<String> = self
            .providers
            .iter()
            .filter(|(_, provider)| provider.supports(operation))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Ordered, deduplicated candidate adapters for a request
    ///
    /// Caller preferences come first, then the operation's configured
    /// defaults. Unknown names and adapters that do not support the
    /// operation are skipped silently; a stale preference should not
    /// fail the request.
    pub fn candidates(
        &self,
        operation: Operation,
        preferred: &[String],
        defaults: &[String],
    ) -> Vec<Arc<dyn GenerationProvider>> {
        let mut seen = Vec::new();
        let mut candidates = Vec::new();

        for name in preferred.iter().chain(defaults) {
            if seen.contains(name) {
                continue;
            }
            seen.push(name.clone());

            match self.get(name) {
                Some(provider) if provider.supports(operation) => candidates.push(provider),
                Some(_) => {
                    tracing::debug!(provider = %name, operation = %operation, "provider does not support operation, skipping");
                }
                None => {
                    tracing::debug!(provider = %name, "unknown provider in candidate list, skipping");
                }
            }
        }

        candidates
    }
}

fn build_adapter(name: &str, config: &ProviderConfig) -> Result<Arc<dyn GenerationProvider>, ProviderError> {
    let api_key = resolve_api_key(name, config)?;
    let base_url = config.base_url.as_ref().map(|url| url.as_str().trim_end_matches('/').to_owned());
    let model = config.model.clone();

    Ok(match config.provider_type {
        ProviderType::OpenaiText => Arc::new(OpenAiTextProvider::new(name.to_owned(), api_key, base_url, model)),
        ProviderType::AnthropicText => Arc::new(AnthropicTextProvider::new(name.to_owned(), api_key, base_url, model)),
        ProviderType::OpenaiImage => Arc::new(OpenAiImageProvider::new(name.to_owned(), api_key, base_url, model)),
    })
}

fn resolve_api_key(name: &str, config: &ProviderConfig) -> Result<SecretString, ProviderError> {
    config
        .api_key
        .clone()
        .ok_or_else(|| ProviderError::Config(format!("API key required for provider '{name}'")))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use muse_core::Operation;
    use serde_json::Value;

    use super::*;
    use crate::provider::ProviderRequest;

    struct FakeProvider {
        name: String,
        text: bool,
    }

    #[async_trait]
    impl GenerationProvider for FakeProvider {
        async fn invoke(&self, _request: ProviderRequest<'_>) -> Result<Value, ProviderError> {
            Ok(Value::Null)
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn supports(&self, operation: Operation) -> bool {
            crate::provider::is_text_operation(operation) == self.text
        }
    }

    fn registry() -> ProviderRegistry {
        ProviderRegistry::from_adapters(vec![
            Arc::new(FakeProvider {
                name: "openai".to_owned(),
                text: true,
            }),
            Arc::new(FakeProvider {
                name: "anthropic".to_owned(),
                text: true,
            }),
            Arc::new(FakeProvider {
                name: "dalle".to_owned(),
                text: false,
            }),
        ])
    }

    #[test]
    fn preferences_come_before_defaults() {
        let registry = registry();
        let candidates = registry.candidates(
            Operation::Bio,
            &["anthropic".to_owned()],
            &["openai".to_owned(), "anthropic".to_owned()],
        );
        let names: Vec<&str> = candidates.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["anthropic", "openai"]);
    }

    #[test]
    fn unsupported_and_unknown_names_are_skipped() {
        let registry = registry();
        let candidates = registry.candidates(
            Operation::Bio,
            &["dalle".to_owned(), "ghost".to_owned()],
            &["openai".to_owned()],
        );
        let names: Vec<&str> = candidates.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["openai"]);
    }

    #[test]
    fn supporting_lists_by_operation() {
        let registry = registry();
        assert_eq!(registry.supporting(Operation::Image), ["dalle"]);
        assert_eq!(registry.supporting(Operation::Bio), ["anthropic", "openai"]);
    }
}
