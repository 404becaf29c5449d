//! Site weather codes
//!
//! ilMeteo tags every pictogram with a numeric `data-simbolo` code. Only a
//! handful of those codes are known; everything else renders as overcast.

use serde::{Deserialize, Serialize};

/// Base URL of the small pictogram set served by the site
pub const ICON_BASE_URL: &str = "https://www.ilmeteo.it/img/meteo/s";

/// Icon category a weather code resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconCategory {
    /// Clear sky, daytime
    Sun,
    /// Clear sky, night
    Moon,
    /// Cloudy
    Cloud,
    /// Snowfall
    Snow,
    /// Rain
    Rain,
    /// Thunderstorm
    Storm,
    /// Fog or mist
    Fog,
    /// Overcast, also used for unknown codes
    Overcast,
}

impl IconCategory {
    /// Resolve a site weather code
    ///
    /// Total over all integers: unmapped codes fall through to [`Self::Overcast`].
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            1 | 10 => Self::Sun,
            2 | 110 => Self::Moon,
            3 | 4 | 11 => Self::Cloud,
            13 | 111 | 113 => Self::Snow,
            5 | 12 | 112 => Self::Rain,
            19 | 20 => Self::Storm,
            23 | 24 => Self::Fog,
            _ => Self::Overcast,
        }
    }

    /// File stem of the site pictogram
    #[must_use]
    pub const fn asset_name(&self) -> &'static str {
        match self {
            Self::Sun => "sole",
            Self::Moon => "luna",
            Self::Cloud => "nuvoloso",
            Self::Snow => "neve",
            Self::Rain => "pioggia",
            Self::Storm => "temporale",
            Self::Fog => "nebbia",
            Self::Overcast => "coperto",
        }
    }

    /// Absolute URL of the site pictogram
    #[must_use]
    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}.png", self.asset_name())
    }
}

impl std::fmt::Display for IconCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.asset_name())
    }
}

/// Map a site weather code to its icon category
#[must_use]
pub const fn resolve(code: i32) -> IconCategory {
    IconCategory::from_code(code)
}
