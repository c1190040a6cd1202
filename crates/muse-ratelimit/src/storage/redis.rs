use std::time::Duration;

use crate::error::RateLimitError;

/// Fixed-window limiter backed by a shared Redis counter, for running
/// several gateway instances against one budget.
#[derive(Clone)]
pub struct RedisLimiter {
    client: redis::Client,
    max_requests: u32,
    window: Duration,
}

impl RedisLimiter {
    pub fn new(url: &str, max_requests: u32, window: Duration) -> Result<Self, RateLimitError> {
        let client =
            redis::Client::open(url).map_err(|e| RateLimitError::Redis(format!("invalid Redis URL: {e}")))?;

        Ok(Self {
            client,
            max_requests,
            window,
        })
    }

    /// Consume one slot for the key, or report how long to wait
    pub async fn check(&self, key: &str) -> Result<(), RateLimitError> {
        use redis::AsyncCommands;

        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| RateLimitError::Redis(format!("connection failed: {e}")))?;

        let counter_key = format!("muse:ratelimit:{key}");
        let window_secs = self.window.as_secs().max(1);

        // SET NX seeds the counter with its expiry in the same round trip
        // as the INCR, so a crash between the two commands cannot leave a
        // counter that never expires. The seed is a no-op once the key
        // exists, and the expiry set at creation outlives every INCR in
        // the window.
        let (count,): (u32,) = redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(&counter_key)
            .arg(0)
            .arg("NX")
            .arg("EX")
            .arg(window_secs)
            .ignore()
            .incr(&counter_key, 1u32)
            .query_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::Redis(format!("counter update failed: {e}")))?;

        if count > self.max_requests {
            let ttl: i64 = conn
                .ttl(&counter_key)
                .await
                .map_err(|e| RateLimitError::Redis(format!("TTL lookup failed: {e}")))?;

            return Err(RateLimitError::Exceeded {
                retry_after: u64::try_from(ttl.max(1)).unwrap_or(window_secs),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_is_rejected_up_front() {
        let result = RedisLimiter::new("not-a-redis-url", 10, Duration::from_secs(60));
        assert!(matches!(result, Err(RateLimitError::Redis(_))));
    }
}
