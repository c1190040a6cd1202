use http::StatusCode;
use thiserror::Error;

/// Quota ledger errors
#[derive(Debug, Error)]
pub enum QuotaError {
    /// The user has consumed their tier limit for this billing period
    #[error("quota exceeded: {used} of {limit} used this period")]
    Exceeded {
        /// Usage consumed so far this period
        used: u64,
        /// Configured tier limit
        limit: i64,
    },

    /// Usage counter backend failure
    #[error("usage store: {0}")]
    Store(String),
}

impl muse_core::HttpError for QuotaError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Exceeded { .. } => StatusCode::FORBIDDEN,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Self::Exceeded { .. } => "quota_exceeded",
            Self::Store(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Exceeded { .. } => self.to_string(),
            Self::Store(_) => "internal server error".to_owned(),
        }
    }
}
