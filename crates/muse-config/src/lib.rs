#![allow(clippy::must_use_candidate)]

//! Configuration for the muse generation core
//!
//! Loaded from TOML with `{{ env.VAR }}` expansion. Every component takes
//! its section by reference at construction; nothing reads config through
//! global state.

pub mod cache;
mod env;
mod loader;
pub mod provider;
pub mod quota;
pub mod rate_limit;
pub mod routing;

use std::collections::HashMap;

use serde::Deserialize;

pub use cache::CacheConfig;
pub use provider::{ProviderConfig, ProviderType};
pub use quota::QuotaConfig;
pub use rate_limit::{ClassRateLimit, RateLimitConfig, RateLimitStorage, RedisConfig};
pub use routing::OperationRouting;

/// Top-level muse configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Generation providers, keyed by registry name
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Per-operation routing (provider priority, timeout, cache TTL)
    #[serde(default)]
    pub operations: HashMap<muse_core::Operation, OperationRouting>,
    /// Rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Result cache
    #[serde(default)]
    pub cache: CacheConfig,
    /// Tier quota limits
    #[serde(default)]
    pub quota: QuotaConfig,
}

impl Config {
    /// Routing for an operation, or the class defaults when unconfigured
    ///
    /// An unconfigured operation has no default provider priority list:
    /// only caller-preferred providers are tried before the local fallback.
    /// A routing with no TTL of its own inherits the cache section's
    /// `default_ttl_seconds`.
    pub fn routing_for(&self, operation: muse_core::Operation) -> OperationRouting {
        let mut routing = self
            .operations
            .get(&operation)
            .cloned()
            .unwrap_or_else(|| OperationRouting::defaults_for(operation));
        routing.cache_ttl_secs.get_or_insert(self.cache.default_ttl_seconds);
        routing
    }
}
