//! Stop directory error types.

/// Errors that can occur while fetching or decoding the stop directory.
///
/// Cloneable so that every caller coalesced onto one in-flight fetch can
/// receive the same outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// Transport failed (connection refused, DNS, TLS, ...)
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// Request did not complete in time
    #[error("directory request timed out")]
    Timeout,

    /// API returned a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not a valid stop list
    #[error("JSON parse error: {message}")]
    Json { message: String },
}

impl From<reqwest::Error> for DirectoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DirectoryError::Timeout
        } else {
            DirectoryError::Http {
                message: err.to_string(),
            }
        }
    }
}
