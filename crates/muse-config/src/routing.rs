use std::time::Duration;

use muse_core::{Operation, OperationClass};
use serde::Deserialize;

/// Routing and caching policy for one operation
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationRouting {
    /// Default provider priority, tried in order after caller preferences
    #[serde(default)]
    pub providers: Vec<String>,
    /// Per-attempt provider timeout in seconds; defaults by operation
    /// class (text is shorter than image)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Result cache TTL in seconds; falls back to the cache section's
    /// `default_ttl_seconds` when unset
    #[serde(default)]
    pub cache_ttl_secs: Option<u64>,
    /// Fold the user id into the fingerprint so results are never shared
    /// across users
    #[serde(default)]
    pub user_scoped: bool,
}

impl OperationRouting {
    /// Defaults for an operation absent from the config
    pub fn defaults_for(_operation: Operation) -> Self {
        Self {
            providers: Vec::new(),
            timeout_secs: None,
            cache_ttl_secs: None,
            user_scoped: false,
        }
    }

    /// Provider timeout for this operation
    pub fn timeout(&self, operation: Operation) -> Duration {
        let secs = self.timeout_secs.unwrap_or(match operation.operation_class() {
            OperationClass::AiImage => 30,
            OperationClass::AiBio | OperationClass::AiPrompt => 10,
        });
        Duration::from_secs(secs)
    }

    /// Result cache TTL for this operation
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs.unwrap_or(3600))
    }
}
