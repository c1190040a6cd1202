use std::collections::HashMap;

use muse_core::Operation;
use serde::Serialize;

/// Provider coverage for a single operation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationAvailability {
    pub available: bool,
    /// Candidate providers in priority order
    pub providers: Vec<String>,
}

/// Provider coverage across every operation
///
/// Computed from configuration and the registry alone. An operation
/// with no candidates still works through the local fallback, so
/// `available: false` means degraded output, not an outage.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceAvailability {
    pub operations: HashMap<Operation, OperationAvailability>,
}

impl ServiceAvailability {
    pub fn is_fully_available(&self) -> bool {
        self.operations.values().all(|op| op.available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_serializes_operation_keys_as_strings() {
        let availability = ServiceAvailability {
            operations: HashMap::from([(Operation::Bio, OperationAvailability {
                available: true,
                providers: vec!["openai".to_owned()],
            })]),
        };

        let json = serde_json::to_value(&availability).unwrap();
        assert_eq!(json["operations"]["bio"]["available"], true);
    }

    #[test]
    fn fully_available_requires_every_operation() {
        let availability = ServiceAvailability {
            operations: HashMap::from([
                (Operation::Bio, OperationAvailability { available: true, providers: vec!["a".to_owned()] }),
                (Operation::Image, OperationAvailability { available: false, providers: vec![] }),
            ]),
        };

        assert!(!availability.is_fully_available());
    }
}
