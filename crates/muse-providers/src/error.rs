use thiserror::Error;

/// Closed error taxonomy for provider adapters
///
/// The orchestrator treats every variant the same way (record the attempt,
/// try the next candidate), so adapters are free to map their wire
/// errors coarsely.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The attempt exceeded the operation's timeout
    #[error("provider timed out")]
    Timeout,

    /// Connection failure or upstream outage
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Upstream rejected the request
    #[error("provider API error ({status}): {message}")]
    Api {
        /// HTTP status from the upstream
        status: u16,
        /// Upstream error body
        message: String,
    },

    /// Missing or rejected credentials
    #[error("provider authentication failed: {0}")]
    Auth(String),

    /// Upstream responded with something the adapter cannot use
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Adapter misconfiguration caught at registry build
    #[error("provider configuration error: {0}")]
    Config(String),
}

impl ProviderError {
    /// Map an upstream HTTP status and body into the taxonomy
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => Self::Auth(message),
            408 => Self::Timeout,
            429 | 500..=599 => Self::Unavailable(message),
            _ => Self::Api { status, message },
        }
    }

    /// Map a reqwest transport error into the taxonomy
    pub fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Unavailable(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses_map_to_auth() {
        assert!(matches!(ProviderError::from_status(401, String::new()), ProviderError::Auth(_)));
        assert!(matches!(ProviderError::from_status(403, String::new()), ProviderError::Auth(_)));
    }

    #[test]
    fn server_errors_map_to_unavailable() {
        assert!(matches!(
            ProviderError::from_status(503, String::new()),
            ProviderError::Unavailable(_)
        ));
        assert!(matches!(
            ProviderError::from_status(429, String::new()),
            ProviderError::Unavailable(_)
        ));
    }

    #[test]
    fn client_errors_keep_their_status() {
        assert!(matches!(
            ProviderError::from_status(422, String::new()),
            ProviderError::Api { status: 422, .. }
        ));
    }
}
