//! Forecast data models
//!
//! Plain records produced by the extractors. All display values are kept as
//! the site renders them (unit-suffixed strings), nothing is re-parsed.

use serde::{Deserialize, Serialize};

/// Placeholder for values the page does not provide
pub const UNAVAILABLE: &str = "--";

/// One day of the multi-day forecast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyForecastItem {
    /// Short label, e.g. "Lun 25"
    pub day: String,
    /// Full label as shown on the page
    pub date: String,
    /// Icon URL or symbolic reference
    pub icon_ref: String,
    /// Site weather code (0 = unknown)
    pub weather_code: i32,
    /// Minimum temperature, e.g. "3°"
    pub min_temp: String,
    /// Maximum temperature, e.g. "9°"
    pub max_temp: String,
    /// Free-text description
    pub description: String,
    /// Link to the hourly detail page, empty if unavailable
    pub link: String,
    /// Set only on the synthetic item standing in for a failed extraction
    #[serde(default)]
    pub failed: bool,
}

impl DailyForecastItem {
    /// Synthetic item shown when the page could not be extracted at all
    #[must_use]
    pub fn error(cause: impl Into<String>) -> Self {
        Self {
            day: "Error".to_string(),
            date: "Download failed".to_string(),
            icon_ref: String::new(),
            weather_code: 0,
            min_temp: UNAVAILABLE.to_string(),
            max_temp: UNAVAILABLE.to_string(),
            description: cause.into(),
            link: String::new(),
            failed: true,
        }
    }

    /// Whether this is the synthetic error item
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.failed
    }

    /// Whether an hourly detail page can be requested for this day
    #[must_use]
    pub fn has_detail(&self) -> bool {
        !self.link.is_empty()
    }

    /// One-line summary for logs and terminal output
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} {}/{} {}",
            self.day, self.min_temp, self.max_temp, self.description
        )
    }
}

/// Precipitation kind shown in the hourly rain cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RainType {
    /// No precipitation marker
    #[default]
    None,
    /// Rain
    Rain,
    /// Snow
    Snow,
}

impl RainType {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rain => "rain",
            Self::Snow => "snow",
        }
    }
}

impl std::fmt::Display for RainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Meaning of the last, station-dependent column of the hourly table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HumidityLabel {
    /// Relative humidity in percent
    #[default]
    #[serde(rename = "UR%")]
    HumidityPercent,
    /// Perceived temperature
    #[serde(rename = "TP°")]
    PerceivedTemperature,
}

impl HumidityLabel {
    /// Column header as rendered by the presentation layer
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HumidityPercent => "UR%",
            Self::PerceivedTemperature => "TP°",
        }
    }

    /// Unit the column value must carry
    #[must_use]
    pub const fn unit(&self) -> char {
        match self {
            Self::HumidityPercent => '%',
            Self::PerceivedTemperature => '°',
        }
    }
}

impl std::fmt::Display for HumidityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One hour slot of a day's detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyForecastItem {
    /// Time label as found on the page ("14:00" or a bare "3")
    pub time: String,
    /// Icon URL
    pub icon_ref: String,
    /// Site weather code (0 = unknown)
    pub weather_code: i32,
    /// Temperature, e.g. "8°"
    pub temp: String,
    /// Precipitation text, e.g. "1 mm"
    pub rain: String,
    /// Precipitation kind
    pub rain_type: RainType,
    /// Wind text, e.g. "W 5 km/h"
    pub wind: String,
    /// Snow level, best effort
    pub snow_level: String,
    /// Air quality, best effort
    pub air_quality: String,
    /// Visibility, best effort
    pub visibility: String,
    /// Value of the dynamic last column, unit-suffixed
    pub humidity_value: String,
    /// What `humidity_value` contains
    pub humidity_label: HumidityLabel,
}

impl HourlyForecastItem {
    /// One-line summary for logs and terminal output
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{:>5} {:>5} {:<12} ({}) {:<14} {}={}",
            self.time,
            self.temp,
            self.rain,
            self.rain_type,
            self.wind,
            self.humidity_label,
            self.humidity_value
        )
    }
}
