pub(crate) mod anthropic_text;
pub(crate) mod openai_image;
pub(crate) mod openai_text;

use async_trait::async_trait;
use muse_core::{GenerationOptions, Operation};
use serde_json::{Map, Value};

use crate::error::ProviderError;

/// Uniform request passed to every adapter
///
/// Borrowed views into the orchestrator's request; adapters translate
/// these into their provider's wire shape.
#[derive(Debug, Clone, Copy)]
pub struct ProviderRequest<'a> {
    /// Requested operation
    pub operation: Operation,
    /// Operation-specific input fields
    pub payload: &'a Map<String, Value>,
    /// Cross-operation options
    pub options: &'a GenerationOptions,
}

/// Trait for generation provider implementations
///
/// Timeouts are enforced by the caller, which wraps `invoke` in
/// `tokio::time::timeout`; adapters only translate requests and map
/// errors into [`ProviderError`].
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Produce an artifact for the request
    async fn invoke(&self, request: ProviderRequest<'_>) -> Result<Value, ProviderError>;

    /// Registry name of this provider
    fn name(&self) -> &str;

    /// Whether this provider can serve the operation
    fn supports(&self, operation: Operation) -> bool;
}

/// Key under which an operation's artifact is returned
pub(crate) fn output_key(operation: Operation) -> &'static str {
    match operation {
        Operation::Bio => "bio",
        Operation::Description => "description",
        Operation::PromptRewrite => "optimized_prompt",
        Operation::PromptAnalysis => "analysis",
        Operation::PromptVariations => "variations",
        Operation::Image | Operation::ImageVariations => "images",
    }
}

/// Whether the operation produces text (vs images)
pub(crate) fn is_text_operation(operation: Operation) -> bool {
    !matches!(operation, Operation::Image | Operation::ImageVariations)
}
