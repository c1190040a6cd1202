use std::collections::HashMap;
use std::time::Duration;

use muse_config::{RateLimitConfig, RateLimitStorage};
use muse_core::OperationClass;
use strum::IntoEnumIterator;

use crate::{
    error::RateLimitError,
    storage::{memory::MemoryLimiter, redis::RedisLimiter},
};

/// Per-user, per-operation-class rate limiter
///
/// One limiter per class, built up-front from configuration. Classes
/// share nothing: exhausting the image bucket does not affect text
/// operations for the same user.
pub struct OperationLimiter {
    limiters: HashMap<OperationClass, Limiter>,
}

enum Limiter {
    Memory(MemoryLimiter),
    Redis(RedisLimiter),
}

impl OperationLimiter {
    /// Create from configuration
    pub fn new(config: &RateLimitConfig) -> Result<Self, RateLimitError> {
        let mut limiters = HashMap::new();

        for class in OperationClass::iter() {
            let limit = config.class_limit(&class.to_string());
            let window = parse_window(&limit.window)?;

            let limiter = match &config.storage {
                RateLimitStorage::Memory => Limiter::Memory(MemoryLimiter::new(limit.requests, window)?),
                RateLimitStorage::Redis(redis_config) => {
                    Limiter::Redis(RedisLimiter::new(redis_config.url.as_str(), limit.requests, window)?)
                }
            };

            limiters.insert(class, limiter);
        }

        Ok(Self { limiters })
    }

    /// Atomically consume one slot for `(user, class)`
    ///
    /// # Errors
    ///
    /// `RateLimitError::Exceeded` with the retry delay when the user has
    /// exhausted the class bucket, or a storage error
    pub async fn check(&self, user_id: &str, class: OperationClass) -> Result<(), RateLimitError> {
        let limiter = self
            .limiters
            .get(&class)
            .ok_or_else(|| RateLimitError::Config(format!("no limiter for class '{class}'")))?;

        let result = match limiter {
            Limiter::Memory(m) => m.check(user_id),
            Limiter::Redis(r) => r.check(&format!("{class}:{user_id}")).await,
        };

        if let Err(RateLimitError::Exceeded { retry_after }) = &result {
            tracing::debug!(user_id, class = %class, retry_after, "rate limit exceeded");
        }

        result
    }
}

fn parse_window(s: &str) -> Result<Duration, RateLimitError> {
    duration_str::parse(s).map_err(|e| RateLimitError::Config(format!("invalid duration '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use muse_config::ClassRateLimit;

    use super::*;

    fn config_with_image_limit(requests: u32) -> RateLimitConfig {
        let mut config = RateLimitConfig::default();
        config.classes.insert(
            OperationClass::AiImage.to_string(),
            ClassRateLimit {
                requests,
                window: "1m".to_owned(),
            },
        );
        config
    }

    #[tokio::test]
    async fn classes_are_independent_buckets() {
        let limiter = OperationLimiter::new(&config_with_image_limit(1)).unwrap();

        limiter.check("usr_1", OperationClass::AiImage).await.unwrap();
        let err = limiter.check("usr_1", OperationClass::AiImage).await.unwrap_err();
        assert!(matches!(err, RateLimitError::Exceeded { .. }));

        // Text bucket still open for the same user
        limiter.check("usr_1", OperationClass::AiBio).await.unwrap();
    }

    #[tokio::test]
    async fn users_are_independent() {
        let limiter = OperationLimiter::new(&config_with_image_limit(1)).unwrap();

        limiter.check("usr_1", OperationClass::AiImage).await.unwrap();
        limiter.check("usr_2", OperationClass::AiImage).await.unwrap();
    }
}
