/// Error types for the Kundli client
use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the Jyotish backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// Backend answered with a non-success status
    #[error("backend returned HTTP {0}")]
    Status(StatusCode),

    /// Request could not complete (connect, timeout, reset)
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Body arrived but was not the expected JSON
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether the backend was reached and refused
    pub fn is_http_status(&self) -> bool {
        matches!(self, ApiError::Status(_))
    }
}

/// Rejections by the date/time/choice widgets of the birth form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid time '{0}', expected HH:MM or HH:MM:SS")]
    InvalidTime(String),

    #[error("invalid gender '{0}', expected male, female or other")]
    InvalidGender(String),

    #[error("no search result at index {0}")]
    NoSuchCandidate(usize),
}
