//! ilMeteo client configuration

use serde::{Deserialize, Serialize};

/// Configuration for fetching ilMeteo pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IlMeteoConfig {
    /// Base URL of the city pages (default: <https://www.ilmeteo.it/meteo>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request; the site answers 403 to obvious bots
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// `Accept` header sent with every request
    #[serde(default = "default_accept")]
    pub accept: String,

    /// City whose page is fetched by the health check
    #[serde(default = "default_health_check_city")]
    pub health_check_city: String,
}

fn default_base_url() -> String {
    "https://www.ilmeteo.it/meteo".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_accept() -> String {
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8".to_string()
}

fn default_health_check_city() -> String {
    "Roma".to_string()
}

impl Default for IlMeteoConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            accept: default_accept(),
            health_check_city: default_health_check_city(),
        }
    }
}

impl IlMeteoConfig {
    /// Create a configuration for testing against a local server
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| format!("base_url is not a valid URL: {e}"))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err("base_url must use http or https".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }

        if self.health_check_city.trim().is_empty() {
            return Err("health_check_city must not be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IlMeteoConfig::default();
        assert_eq!(config.base_url, "https://www.ilmeteo.it/meteo");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert!(config.accept.starts_with("text/html"));
        assert_eq!(config.health_check_city, "Roma");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_testing_config() {
        let config = IlMeteoConfig::for_testing("http://127.0.0.1:9999/meteo");
        assert_eq!(config.base_url, "http://127.0.0.1:9999/meteo");
        assert_eq!(config.timeout_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_base_url() {
        let config = IlMeteoConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = IlMeteoConfig {
            base_url: "ftp://www.ilmeteo.it/meteo".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_timeout() {
        let config = IlMeteoConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_user_agent() {
        let config = IlMeteoConfig {
            user_agent: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: IlMeteoConfig =
            serde_json::from_str(r#"{"timeout_secs": 10}"#).expect("should deserialize");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.base_url, "https://www.ilmeteo.it/meteo");
    }
}
