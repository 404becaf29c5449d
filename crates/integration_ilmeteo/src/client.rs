//! ilMeteo forecast client
//!
//! Ties page fetching to extraction: city name → page URL → markup → DOM →
//! forecast records.

use scraper::Html;
use tracing::{debug, instrument};
use url::Url;

use crate::{
    config::IlMeteoConfig,
    daily::DailyForecastExtractor,
    error::ForecastError,
    fetcher::{DocumentFetcher, HttpDocumentFetcher},
    hourly::HourlyForecastExtractor,
    models::{DailyForecastItem, HourlyForecastItem},
};

/// Forecast client for ilMeteo city pages
///
/// Transport failures are returned as errors. Extraction itself never fails:
/// see [`DailyForecastExtractor::extract`] and
/// [`HourlyForecastExtractor::extract`].
#[derive(Debug)]
pub struct ForecastClient<F = HttpDocumentFetcher> {
    fetcher: F,
    config: IlMeteoConfig,
    daily: DailyForecastExtractor,
    hourly: HourlyForecastExtractor,
}

impl ForecastClient<HttpDocumentFetcher> {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: IlMeteoConfig) -> Result<Self, ForecastError> {
        config
            .validate()
            .map_err(ForecastError::ConfigurationError)?;
        let fetcher = HttpDocumentFetcher::new(&config)?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, ForecastError> {
        Self::new(IlMeteoConfig::default())
    }
}

impl<F: DocumentFetcher> ForecastClient<F> {
    /// Create a client on top of any page fetcher
    #[must_use]
    pub const fn with_fetcher(config: IlMeteoConfig, fetcher: F) -> Self {
        Self {
            fetcher,
            config,
            daily: DailyForecastExtractor::new(),
            hourly: HourlyForecastExtractor::new(),
        }
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &IlMeteoConfig {
        &self.config
    }

    /// URL of a city's main forecast page
    ///
    /// The site spells multi-word cities with dashes ("Reggio-Emilia").
    ///
    /// # Errors
    ///
    /// Returns an error for a blank city or an unusable base URL.
    pub fn city_url(&self, city: &str) -> Result<Url, ForecastError> {
        let slug = city.trim().replace(' ', "-");
        if slug.is_empty() {
            return Err(ForecastError::InvalidCity(city.to_string()));
        }

        let raw = format!("{}/{slug}", self.config.base_url.trim_end_matches('/'));
        Url::parse(&raw).map_err(|e| ForecastError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// URL of a day's hourly detail page
    ///
    /// `link` is what the daily extraction found: absolute URLs are used as
    /// they are, root-relative ones resolve against the site, bare ones
    /// ("domani") against the city page.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank city or link, or a link that does not
    /// resolve to a URL.
    pub fn detail_url(&self, city: &str, link: &str) -> Result<Url, ForecastError> {
        let link = link.trim();
        if link.is_empty() {
            return Err(ForecastError::InvalidUrl(
                "day has no detail link".to_string(),
            ));
        }

        if link.starts_with("http://") || link.starts_with("https://") {
            return Url::parse(link).map_err(|e| ForecastError::InvalidUrl(format!("{link}: {e}")));
        }

        let mut city_dir = self.city_url(city)?;
        city_dir.set_path(&format!("{}/", city_dir.path()));
        city_dir
            .join(link)
            .map_err(|e| ForecastError::InvalidUrl(format!("{link}: {e}")))
    }

    /// Fetch and extract the daily forecast of a city
    ///
    /// # Errors
    ///
    /// Returns an error if the city page cannot be fetched.
    #[instrument(skip(self))]
    pub async fn daily_forecast(&self, city: &str) -> Result<Vec<DailyForecastItem>, ForecastError> {
        let url = self.city_url(city)?;
        let body = self.fetcher.fetch(url.as_str()).await?;

        let days = self.daily.extract(&Html::parse_document(&body));
        debug!(days = days.len(), "Daily forecast ready");
        Ok(days)
    }

    /// Fetch and extract the hourly forecast of one day
    ///
    /// # Errors
    ///
    /// Returns an error if the detail URL cannot be built or the page cannot
    /// be fetched.
    #[instrument(skip(self))]
    pub async fn hourly_forecast(
        &self,
        city: &str,
        link: &str,
    ) -> Result<Vec<HourlyForecastItem>, ForecastError> {
        let url = self.detail_url(city, link)?;
        let body = self.fetcher.fetch(url.as_str()).await?;

        let hours = self.hourly.extract(&Html::parse_document(&body));
        debug!(hours = hours.len(), "Hourly forecast ready");
        Ok(hours)
    }

    /// Check that the site is reachable and still parseable
    pub async fn is_healthy(&self) -> bool {
        self.daily_forecast(&self.config.health_check_city)
            .await
            .is_ok_and(|days| days.first().is_some_and(|day| !day.is_error()))
    }
}
