#![forbid(unsafe_code)]
//! ilMeteo forecast integration
//!
//! Scrapes daily and hourly forecasts from the public city pages of
//! <https://www.ilmeteo.it> and resolves the site's numeric weather codes to
//! icon categories.
//!
//! # Architecture
//!
//! Fetching and extraction are separate. A [`DocumentFetcher`] returns page
//! markup; [`DailyForecastExtractor`] and [`HourlyForecastExtractor`] turn a
//! parsed document into records and never fail. [`ForecastClient`] glues the
//! two together and builds the page URLs.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_ilmeteo::{ForecastClient, IlMeteoConfig};
//!
//! let client = ForecastClient::new(IlMeteoConfig::default())?;
//!
//! let days = client.daily_forecast("Pinerolo").await?;
//! for day in &days {
//!     println!("{}", day.summary());
//! }
//!
//! if let Some(tomorrow) = days.iter().find(|d| d.has_detail()) {
//!     let hours = client.hourly_forecast("Pinerolo", &tomorrow.link).await?;
//!     println!("{} hours", hours.len());
//! }
//! ```

mod client;
mod codes;
mod config;
mod daily;
mod dom;
mod error;
mod fetcher;
mod hourly;
mod icon;
mod models;

pub use client::ForecastClient;
pub use codes::{ICON_BASE_URL, IconCategory, resolve};
pub use config::IlMeteoConfig;
pub use daily::{DailyForecastExtractor, MAX_DAYS};
pub use error::ForecastError;
pub use fetcher::{DocumentFetcher, HttpDocumentFetcher};
pub use hourly::{HourlyForecastExtractor, parse_time_label};
pub use models::{DailyForecastItem, HourlyForecastItem, HumidityLabel, RainType, UNAVAILABLE};
