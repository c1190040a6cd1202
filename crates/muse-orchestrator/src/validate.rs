//! Per-operation payload validation
//!
//! One table, consulted by the orchestrator before anything else runs.
//! Adding an operation means adding a row here, not editing scattered
//! route-level validators. All violations are collected so the caller
//! can fix their request in one round trip.

use muse_core::{GenerationRequest, Operation};
use serde_json::Value;

use crate::error::GenerateError;

/// Payload fields an operation cannot run without
const fn required_fields(operation: Operation) -> &'static [&'static str] {
    match operation {
        Operation::Bio => &["name", "genre"],
        Operation::Description => &["title", "genre"],
        Operation::Image => &["name"],
        Operation::ImageVariations
        | Operation::PromptRewrite
        | Operation::PromptAnalysis
        | Operation::PromptVariations => &["base_prompt"],
    }
}

/// Validate a request against the operation's schema
///
/// # Errors
///
/// `GenerateError::Validation` carrying every violation found
pub(crate) fn validate(request: &GenerationRequest) -> Result<(), GenerateError> {
    let mut violations = Vec::new();

    if request.user.user_id.trim().is_empty() {
        violations.push("user id must not be empty".to_owned());
    }

    for field in required_fields(request.operation) {
        match request.payload.get(*field) {
            Some(Value::String(value)) if !value.trim().is_empty() => {}
            Some(_) => violations.push(format!("field '{field}' must be a non-empty string")),
            None => violations.push(format!("missing required field '{field}'")),
        }
    }

    if request.options.variation_count == Some(0) {
        violations.push("variationCount must be at least 1".to_owned());
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(GenerateError::Validation(violations))
    }
}
