use std::collections::HashMap;

use serde::Deserialize;
use url::Url;

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Storage backend
    #[serde(default)]
    pub storage: RateLimitStorage,
    /// Limit applied when an operation class has no override
    #[serde(default = "default_class_limit")]
    pub default: ClassRateLimit,
    /// Per-class overrides, keyed by class name (e.g. "ai-image")
    #[serde(default)]
    pub classes: HashMap<String, ClassRateLimit>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            storage: RateLimitStorage::default(),
            default: default_class_limit(),
            classes: HashMap::new(),
        }
    }
}

impl RateLimitConfig {
    /// Limit for an operation class, falling back to the default
    pub fn class_limit(&self, class: &str) -> &ClassRateLimit {
        self.classes.get(class).unwrap_or(&self.default)
    }
}

/// Rate limit storage backend
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RateLimitStorage {
    /// In-memory storage (single instance only)
    #[default]
    Memory,
    /// Redis-backed storage (distributed)
    Redis(RedisConfig),
}

/// Redis configuration for rate limiting
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: Url,
}

/// Requests-per-window limit for one operation class
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassRateLimit {
    /// Maximum requests per window
    pub requests: u32,
    /// Window duration (e.g. "1m", "1h")
    pub window: String,
}

fn default_class_limit() -> ClassRateLimit {
    ClassRateLimit {
        requests: 30,
        window: "1m".to_owned(),
    }
}
