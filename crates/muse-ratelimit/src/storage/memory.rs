use std::{num::NonZeroU32, sync::Arc, time::Duration};

use governor::{Quota, RateLimiter, clock::DefaultClock, state::keyed::DashMapStateStore};

use crate::error::RateLimitError;

type KeyedLimiter = RateLimiter<String, DashMapStateStore<String>, DefaultClock>;

/// In-memory per-key limiter backed by governor
///
/// The check-and-consume is atomic: two concurrent calls for the same key
/// cannot both pass when a single token remains.
#[derive(Clone)]
pub struct MemoryLimiter {
    limiter: Arc<KeyedLimiter>,
}

impl MemoryLimiter {
    /// Create a limiter allowing `max_requests` per `window` per key
    pub fn new(max_requests: u32, window: Duration) -> Result<Self, RateLimitError> {
        if window.as_secs() == 0 {
            return Err(RateLimitError::Config("rate limit window must be > 0".to_owned()));
        }

        let burst = NonZeroU32::new(max_requests)
            .ok_or_else(|| RateLimitError::Config("max_requests must be > 0".to_owned()))?;

        // governor expresses limits as a replenish period plus burst size
        let per_second = f64::from(max_requests) / window.as_secs_f64();
        let replenish_interval = Duration::from_secs_f64(1.0 / per_second);

        let quota = Quota::with_period(replenish_interval)
            .ok_or_else(|| RateLimitError::Config("invalid rate limit period".to_owned()))?
            .allow_burst(burst);

        Ok(Self {
            limiter: Arc::new(RateLimiter::dashmap(quota)),
        })
    }

    /// Consume one slot for the key, or report how long to wait
    pub fn check(&self, key: &str) -> Result<(), RateLimitError> {
        match self.limiter.check_key(&key.to_owned()) {
            Ok(()) => Ok(()),
            Err(not_until) => {
                let wait =
                    not_until.wait_time_from(governor::clock::Clock::now(&governor::clock::DefaultClock::default()));
                Err(RateLimitError::Exceeded {
                    retry_after: wait.as_secs().max(1),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_applies_per_key() {
        let limiter = MemoryLimiter::new(2, Duration::from_secs(60)).unwrap();

        limiter.check("alice").unwrap();
        limiter.check("alice").unwrap();
        let err = limiter.check("alice").unwrap_err();
        assert!(matches!(err, RateLimitError::Exceeded { retry_after } if retry_after >= 1));

        // Other keys are unaffected
        limiter.check("bob").unwrap();
    }

    #[test]
    fn zero_window_rejected() {
        assert!(MemoryLimiter::new(10, Duration::ZERO).is_err());
    }
}
