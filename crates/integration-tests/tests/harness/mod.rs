//! Shared fixtures for orchestrator integration tests
#![allow(dead_code)]

pub mod fixture;
pub mod providers;

use muse_core::{GenerationRequest, Identity, Operation, SubscriptionTier};
use serde_json::{Map, Value};

/// Payload map from key/value pairs
pub fn payload(fields: &[(&str, &str)]) -> Map<String, Value> {
    fields
        .iter()
        .map(|&(key, value)| (key.to_owned(), Value::String(value.to_owned())))
        .collect()
}

/// A valid bio request for the given user on the free tier
pub fn bio_request(user_id: &str) -> GenerationRequest {
    request(Operation::Bio, user_id, &[("name", "Nova Echo"), ("genre", "synthwave")])
}

pub fn request(operation: Operation, user_id: &str, fields: &[(&str, &str)]) -> GenerationRequest {
    GenerationRequest::new(
        operation,
        Identity::new(user_id, SubscriptionTier::Free),
        payload(fields),
    )
}
