use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Generation operations supported by the orchestrator
///
/// Each operation has a rate-limiting class (the bucket the rate limiter
/// counts it under) and a billing metric (the quota dimension it consumes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    /// Artist biography text
    Bio,
    /// Artist image
    Image,
    /// Variations of an existing artist image
    ImageVariations,
    /// Rewrite/optimize a creative prompt
    PromptRewrite,
    /// Analyze a creative prompt
    PromptAnalysis,
    /// Generate variations of a creative prompt
    PromptVariations,
    /// Track or release description text
    Description,
}

impl Operation {
    /// Rate-limiting bucket for this operation
    pub const fn operation_class(self) -> OperationClass {
        match self {
            Self::Bio | Self::Description => OperationClass::AiBio,
            Self::Image | Self::ImageVariations => OperationClass::AiImage,
            Self::PromptRewrite | Self::PromptAnalysis | Self::PromptVariations => OperationClass::AiPrompt,
        }
    }

    /// Quota metric this operation consumes
    pub const fn metric_type(self) -> MetricType {
        match self {
            Self::Bio
            | Self::Image
            | Self::ImageVariations
            | Self::PromptRewrite
            | Self::PromptAnalysis
            | Self::PromptVariations
            | Self::Description => MetricType::AiGenerations,
        }
    }
}

/// Rate-limiting bucket, distinct from the billing metric
///
/// Image operations are limited separately from text operations since
/// they are slower and more expensive upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum OperationClass {
    /// Bio and description text generation
    AiBio,
    /// Image generation and variations
    AiImage,
    /// Prompt rewrite/analysis/variations
    AiPrompt,
}

/// Quota-ledger dimension a subscription tier limit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MetricType {
    /// AI generation attempts (all operations)
    AiGenerations,
    /// Track uploads (counted by the upload pipeline, not this core)
    TrackUploads,
}
