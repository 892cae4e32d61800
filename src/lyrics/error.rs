//! Error types for lyrics lookup

use thiserror::Error;

/// Failure of a single provider HTTP fetch, after retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {status}")]
    Http { status: u16 },
    #[error("invalid json body: {0}")]
    Decode(String),
}

impl FetchError {
    /// Statuses worth another attempt: request timeout, rate limit, server side.
    const RETRYABLE_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout | FetchError::Network(_) => true,
            FetchError::Http { status } => Self::RETRYABLE_STATUSES.contains(status),
            FetchError::Decode(_) => false,
        }
    }

    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Http {
                status: status.as_u16(),
            }
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Outcome of a full resolution across both providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LyricsError {
    #[error("song not found or lyrics unavailable across both providers")]
    NotFound,
    #[error("both lyrics providers timed out")]
    NetworkTimeout,
    #[error("lyrics lookup failed across both providers")]
    NetworkError,
}
