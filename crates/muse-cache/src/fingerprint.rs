use muse_core::GenerationRequest;
use sha2::{Digest, Sha256};

/// Compute the cache/coalescing fingerprint for a request
///
/// Hashes the canonical JSON of operation + payload + options. serde_json's
/// default map is ordered, so key order in the incoming payload does not
/// change the hash. `preferred_providers` is excluded: routing preference
/// does not change what content is being asked for. When `user_scoped` is
/// set the user id is folded in, so the artifact is never shared across
/// users.
pub fn fingerprint(request: &GenerationRequest, user_scoped: bool) -> String {
    let mut canonical = serde_json::json!({
        "operation": request.operation,
        "payload": request.payload,
        "options": request.options,
    });

    if user_scoped {
        canonical["user_id"] = serde_json::Value::String(request.user.user_id.clone());
    }

    let json = serde_json::to_string(&canonical).unwrap_or_default();
    let hash = Sha256::digest(json.as_bytes());
    format!("{hash:x}")
}

#[cfg(test)]
mod tests {
    use muse_core::{GenerationOptions, Identity, Operation, SubscriptionTier};
    use serde_json::{Map, Value};

    use super::*;

    fn request_with(payload: Map<String, Value>, user_id: &str) -> GenerationRequest {
        GenerationRequest::new(
            Operation::Bio,
            Identity::new(user_id, SubscriptionTier::Free),
            payload,
        )
    }

    fn bio_payload(name: &str) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("name".to_owned(), Value::String(name.to_owned()));
        payload.insert("genre".to_owned(), Value::String("techno".to_owned()));
        payload
    }

    #[test]
    fn identical_requests_share_a_fingerprint_across_users() {
        let a = request_with(bio_payload("Nova"), "usr_1");
        let b = request_with(bio_payload("Nova"), "usr_2");
        assert_eq!(fingerprint(&a, false), fingerprint(&b, false));
    }

    #[test]
    fn user_scoped_fingerprints_differ_across_users() {
        let a = request_with(bio_payload("Nova"), "usr_1");
        let b = request_with(bio_payload("Nova"), "usr_2");
        assert_ne!(fingerprint(&a, true), fingerprint(&b, true));
    }

    #[test]
    fn payload_changes_change_the_fingerprint() {
        let a = request_with(bio_payload("Nova"), "usr_1");
        let b = request_with(bio_payload("Vela"), "usr_1");
        assert_ne!(fingerprint(&a, false), fingerprint(&b, false));
    }

    #[test]
    fn preferred_providers_do_not_change_the_fingerprint() {
        let a = request_with(bio_payload("Nova"), "usr_1");
        let mut b = a.clone();
        b.preferred_providers = vec!["anthropic".to_owned()];
        assert_eq!(fingerprint(&a, false), fingerprint(&b, false));
    }

    #[test]
    fn options_change_the_fingerprint() {
        let a = request_with(bio_payload("Nova"), "usr_1");
        let mut b = a.clone();
        b.options = GenerationOptions {
            quality: Some("hd".to_owned()),
            ..GenerationOptions::default()
        };
        assert_ne!(fingerprint(&a, false), fingerprint(&b, false));
    }
}
