//! Scripted provider adapters with call counting

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use muse_core::Operation;
use muse_providers::{GenerationProvider, ProviderError, ProviderRequest};
use serde_json::{Value, json};

/// Scripted adapter that returns canned output and counts invocations
pub struct MockProvider {
    name: String,
    response: Value,
    /// Fail this many invocations before succeeding (u32::MAX = always)
    fail_count: AtomicU32,
    delay: Option<Duration>,
    calls: AtomicU32,
}

impl MockProvider {
    /// Always succeeds with a default response
    pub fn ok(name: &str) -> Arc<Self> {
        Arc::new(Self::new(name, None, 0, None))
    }

    /// Always succeeds with the given output
    pub fn ok_with(name: &str, response: Value) -> Arc<Self> {
        Arc::new(Self::new(name, Some(response), 0, None))
    }

    /// Fails every invocation
    pub fn failing(name: &str) -> Arc<Self> {
        Arc::new(Self::new(name, None, u32::MAX, None))
    }

    /// Fails the first `n` invocations, then succeeds
    pub fn fail_first(name: &str, n: u32) -> Arc<Self> {
        Arc::new(Self::new(name, None, n, None))
    }

    /// Succeeds, but only after sleeping for `delay`
    pub fn slow(name: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self::new(name, None, 0, Some(delay)))
    }

    fn new(name: &str, response: Option<Value>, fail_count: u32, delay: Option<Duration>) -> Self {
        let response = response.unwrap_or_else(|| json!({ "content": format!("output from {name}") }));
        Self {
            name: name.to_owned(),
            response,
            fail_count: AtomicU32::new(fail_count),
            delay,
            calls: AtomicU32::new(0),
        }
    }

    /// Total invocations observed
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    async fn invoke(&self, _request: ProviderRequest<'_>) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let remaining = self.fail_count.load(Ordering::SeqCst);
        if remaining > 0 {
            if remaining != u32::MAX {
                self.fail_count.store(remaining - 1, Ordering::SeqCst);
            }
            return Err(ProviderError::Unavailable("scripted failure".to_owned()));
        }

        Ok(self.response.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, _operation: Operation) -> bool {
        true
    }
}
