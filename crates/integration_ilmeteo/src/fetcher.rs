//! Page fetching
//!
//! Extraction never touches the network. A [`DocumentFetcher`] hands back the
//! raw markup of a page; the client parses it into a DOM afterwards.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use tracing::{debug, instrument};

use crate::{config::IlMeteoConfig, error::ForecastError};

/// Port for retrieving page markup
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the markup of the page at `url`
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be retrieved.
    async fn fetch(&self, url: &str) -> Result<String, ForecastError>;
}

/// reqwest-backed fetcher sending browser-like headers
#[derive(Debug, Clone)]
pub struct HttpDocumentFetcher {
    client: Client,
    timeout_secs: u64,
}

impl HttpDocumentFetcher {
    /// Create a new fetcher with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &IlMeteoConfig) -> Result<Self, ForecastError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept)
                .map_err(|e| ForecastError::ConfigurationError(format!("accept header: {e}")))?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| ForecastError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    fn map_status(status: StatusCode, url: &str) -> Result<(), ForecastError> {
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ForecastError::NotFound {
                url: url.to_string(),
            });
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ForecastError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(ForecastError::ServiceUnavailable(format!("HTTP {status}")));
        }
        Err(ForecastError::RequestFailed(format!("HTTP {status}")))
    }
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, ForecastError> {
        debug!("Fetching page");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ForecastError::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else if e.is_connect() {
                ForecastError::ConnectionFailed(e.to_string())
            } else {
                ForecastError::RequestFailed(e.to_string())
            }
        })?;

        Self::map_status(response.status(), url)?;

        let body = response
            .text()
            .await
            .map_err(|e| ForecastError::RequestFailed(e.to_string()))?;

        debug!(bytes = body.len(), "Page fetched");
        Ok(body)
    }
}
