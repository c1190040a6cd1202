use http::StatusCode;
use muse_history::PersistenceError;
use muse_quota::QuotaError;
use muse_ratelimit::RateLimitError;
use thiserror::Error;

/// Errors surfaced to callers of [`crate::Orchestrator::generate`]
///
/// Rate-limit, quota, and system failures are deliberately distinct
/// variants: the route layer must never collapse "slow down", "you are
/// out of quota", and "we broke" into one message.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The payload failed domain validation; every violation is listed
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The user is sending too fast; retryable after the delay
    #[error("rate limit exceeded, retry after {retry_after}s")]
    RateLimited {
        /// Seconds until the operation-class bucket refills
        retry_after: u64,
    },

    /// Tier quota consumed for this billing period
    #[error("quota exceeded: {used} of {limit} used this period")]
    QuotaExceeded {
        /// Usage consumed so far
        used: u64,
        /// Tier limit
        limit: i64,
    },

    /// History could not be written before any provider was attempted
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Rate-limit or quota storage failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RateLimitError> for GenerateError {
    fn from(error: RateLimitError) -> Self {
        match error {
            RateLimitError::Exceeded { retry_after } => Self::RateLimited { retry_after },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<QuotaError> for GenerateError {
    fn from(error: QuotaError) -> Self {
        match error {
            QuotaError::Exceeded { used, limit } => Self::QuotaExceeded { used, limit },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl muse_core::HttpError for GenerateError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::QuotaExceeded { .. } => StatusCode::FORBIDDEN,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::RateLimited { .. } => "rate_limit_exceeded",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::Persistence(_) | Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Persistence(_) | Self::Internal(_) => "internal server error".to_owned(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use muse_core::HttpError;

    use super::*;

    #[test]
    fn the_three_user_facing_failures_are_distinct() {
        let rate = GenerateError::RateLimited { retry_after: 30 };
        let quota = GenerateError::QuotaExceeded { used: 10, limit: 10 };
        let system = GenerateError::Internal("boom".to_owned());

        let codes = [rate.error_code(), quota.error_code(), system.error_code()];
        assert_eq!(codes, ["rate_limit_exceeded", "quota_exceeded", "internal_error"]);

        assert_eq!(rate.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(quota.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(system.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let error = GenerateError::Internal("redis connection refused at 10.0.0.3".to_owned());
        assert_eq!(error.client_message(), "internal server error");
    }

    #[test]
    fn validation_lists_every_violation() {
        let error = GenerateError::Validation(vec!["missing 'name'".to_owned(), "missing 'genre'".to_owned()]);
        assert!(error.to_string().contains("missing 'name'"));
        assert!(error.to_string().contains("missing 'genre'"));
    }
}
