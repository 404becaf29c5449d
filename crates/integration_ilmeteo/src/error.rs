//! ilMeteo error types

use thiserror::Error;

/// Errors surfaced to callers of the forecast client
///
/// Only transport and input problems end up here. Markup that does not match
/// the expected shape is never an error (see the extractors).
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Connection to the site failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Request timed out
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// The page does not exist (usually an unknown city)
    #[error("Page not found: {url}")]
    NotFound {
        /// Requested URL
        url: String,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Site is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// City name is empty or blank
    #[error("Invalid city: {0:?}")]
    InvalidCity(String),

    /// A page URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl ForecastError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::ServiceUnavailable(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded
        )
    }
}

/// Internal failure while walking a document
///
/// Never leaves the extractors: daily extraction turns it into an error item,
/// hourly extraction into an empty result.
#[derive(Debug, Error)]
pub(crate) enum ExtractError {
    /// A CSS selector did not compile
    #[error("invalid selector `{selector}`: {reason}")]
    Selector {
        /// Selector source
        selector: String,
        /// Parser message
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(ForecastError::ConnectionFailed("test".to_string()).is_retryable());
        assert!(ForecastError::RequestFailed("test".to_string()).is_retryable());
        assert!(ForecastError::ServiceUnavailable("test".to_string()).is_retryable());
        assert!(ForecastError::Timeout { timeout_secs: 30 }.is_retryable());
        assert!(ForecastError::RateLimitExceeded.is_retryable());

        assert!(
            !ForecastError::NotFound {
                url: "https://www.ilmeteo.it/meteo/Atlantide".to_string()
            }
            .is_retryable()
        );
        assert!(!ForecastError::InvalidCity(String::new()).is_retryable());
        assert!(!ForecastError::InvalidUrl("test".to_string()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = ForecastError::Timeout { timeout_secs: 12 };
        assert!(err.to_string().contains("12"));

        let err = ForecastError::NotFound {
            url: "https://www.ilmeteo.it/meteo/Atlantide".to_string(),
        };
        assert!(err.to_string().contains("Atlantide"));

        let err = ForecastError::InvalidCity("  ".to_string());
        assert_eq!(err.to_string(), "Invalid city: \"  \"");
    }

    #[test]
    fn test_extract_error_display() {
        let err = ExtractError::Selector {
            selector: "td[".to_string(),
            reason: "unexpected end".to_string(),
        };
        assert_eq!(err.to_string(), "invalid selector `td[`: unexpected end");
    }
}
