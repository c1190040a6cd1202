use http::StatusCode;
use thiserror::Error;

/// Rate limiting errors
#[derive(Debug, Error)]
pub enum RateLimitError {
    /// Configuration error
    #[error("rate limit configuration error: {0}")]
    Config(String),

    /// Redis connection error
    #[error("redis connection error: {0}")]
    Redis(String),

    /// Rate limit exceeded
    #[error("rate limit exceeded, retry after {retry_after}s")]
    Exceeded {
        /// Seconds until the limit resets
        retry_after: u64,
    },
}

impl muse_core::HttpError for RateLimitError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Exceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Config(_) | Self::Redis(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Self::Exceeded { .. } => "rate_limit_exceeded",
            Self::Config(_) | Self::Redis(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Exceeded { .. } => self.to_string(),
            Self::Config(_) | Self::Redis(_) => "internal server error".to_owned(),
        }
    }
}
