#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

//! Per-user, per-operation-class rate limiting
//!
//! Independent of subscription tier: quota enforcement lives in
//! `muse-quota`, this crate only smooths burst traffic. Backed by
//! governor in-memory state or Redis sliding windows depending on
//! configuration.

mod error;
mod limiter;
pub mod storage;

pub use error::RateLimitError;
pub use limiter::OperationLimiter;

use muse_config::RateLimitConfig;

/// Create an operation limiter from configuration
pub fn create_limiter(config: &RateLimitConfig) -> Result<OperationLimiter, RateLimitError> {
    OperationLimiter::new(config)
}
