//! Stop ETA error types.

use std::fmt;

/// Errors from fetching arrival estimates for a stop.
///
/// A failure here only affects the one stop being expanded.
#[derive(Debug)]
pub enum EtaError {
    /// HTTP request failed (network error, TLS, etc.)
    Http(reqwest::Error),

    /// Request did not complete in time
    Timeout,

    /// API returned an error status code
    ApiError { status: u16, message: String },

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// A newer request replaced this one
    Superseded,

    /// Configured base URL cannot have a stop path appended
    InvalidUrl { url: String },
}

impl fmt::Display for EtaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EtaError::Http(e) => write!(f, "HTTP error: {e}"),
            EtaError::Timeout => write!(f, "ETA request timed out"),
            EtaError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            EtaError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            EtaError::Superseded => write!(f, "ETA request superseded by a newer request"),
            EtaError::InvalidUrl { url } => write!(f, "invalid ETA base URL: {url}"),
        }
    }
}

impl std::error::Error for EtaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EtaError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for EtaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EtaError::Timeout
        } else {
            EtaError::Http(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EtaError::ApiError {
            status: 422,
            message: "Invalid stop".into(),
        };
        assert_eq!(err.to_string(), "API error 422: Invalid stop");

        let err = EtaError::Json {
            message: "expected array".into(),
            body: Some("{}".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("(body: {})"));

        assert_eq!(EtaError::Timeout.to_string(), "ETA request timed out");
    }
}
