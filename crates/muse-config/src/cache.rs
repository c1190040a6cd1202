use serde::Deserialize;

/// Result cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Whether result caching is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Maximum number of cached artifacts before eviction
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    /// TTL applied when an operation's routing does not set one
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_entries: default_max_entries(),
            default_ttl_seconds: default_ttl_seconds(),
        }
    }
}

const fn default_enabled() -> bool {
    true
}

const fn default_max_entries() -> u64 {
    10_000
}

const fn default_ttl_seconds() -> u64 {
    3600
}
