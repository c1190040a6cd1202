use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{Identity, Operation};

/// A single inbound generation request
///
/// Immutable once constructed; the orchestrator never mutates it. The
/// payload carries operation-specific fields (name, genre, `visual_style`,
/// `base_prompt`, ...) validated against the per-operation schema table.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Requested operation
    pub operation: Operation,
    /// Caller identity (user id + subscription tier)
    pub user: Identity,
    /// Operation-specific input fields
    pub payload: Map<String, Value>,
    /// Caller-preferred provider ordering, tried before the configured
    /// defaults; unknown or unsupported names are skipped
    pub preferred_providers: Vec<String>,
    /// Cross-operation options
    pub options: GenerationOptions,
}

impl GenerationRequest {
    /// Build a request with default options and no provider preference
    pub fn new(operation: Operation, user: Identity, payload: Map<String, Value>) -> Self {
        Self {
            operation,
            user,
            payload,
            preferred_providers: Vec::new(),
            options: GenerationOptions::default(),
        }
    }
}

/// Options shared across operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationOptions {
    /// Output quality hint ("standard", "hd", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    /// Number of variations to produce, for variation operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation_count: Option<u32>,
    /// Platforms the output is targeted at (e.g. "spotify", "instagram")
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target_platforms: Vec<String>,
    /// Forward-compatible extra options, folded into the fingerprint
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Outcome of a generation call, returned to the route layer as plain data
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// The generated artifact
    pub output: Value,
    /// Provider that produced the output, or "local-template" when degraded
    pub provider: String,
    /// Whether the output was served from the result cache
    pub from_cache: bool,
    /// Whether the output is a locally synthesized fallback
    pub degraded: bool,
    /// History record for this attempt; absent on cache hits, which
    /// write no history
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<Uuid>,
}
