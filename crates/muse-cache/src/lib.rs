#![allow(clippy::must_use_candidate)]

//! Content-addressed result cache for generated artifacts
//!
//! Keys are SHA-256 fingerprints of the canonicalized request (operation +
//! payload + options), so two logically identical requests from different
//! users share a hit unless the operation is configured user-scoped.
//! Entries carry their own expiry; capacity pressure evicts in LRU order.

mod fingerprint;
mod store;

pub use fingerprint::fingerprint;
pub use store::{CacheStats, CachedArtifact, ResultCache};
