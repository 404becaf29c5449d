//! Daily forecast extraction
//!
//! Reads the multi-day summary from a city's main forecast page. Two page
//! generations are supported:
//!
//! - the day-selector card list (`.forecast_day_selector__list`), which also
//!   carries the links to the hourly detail pages;
//! - the legacy table layout, recognised by rows mentioning a degree sign and
//!   an Italian day abbreviation. Legacy rows have no detail links.

use std::collections::HashSet;

use scraper::Html;
use tracing::{debug, trace, warn};

use crate::{
    codes::IconCategory,
    dom::{css, normalize_image_src, text_of},
    error::ExtractError,
    icon::{DAILY_STRATEGIES, IconSelectors, resolve_icon},
    models::{DailyForecastItem, UNAVAILABLE},
};

/// Maximum number of days returned
pub const MAX_DAYS: usize = 7;

/// Length of the short `day` label ("Lun 25")
const DAY_LABEL_CHARS: usize = 6;

const DAY_ABBREVIATIONS: &[&str] = &["Lun", "Mar", "Mer", "Gio", "Ven", "Sab", "Dom"];

const LEGACY_DESCRIPTION: &str = "Forecast";

const DAY_LIST: &str = ".forecast_day_selector__list li.forecast_day_selector__list__item";
const DAY_TEMPERATURES: &str = ".forecast_day_selector__list__item__link__values";

/// Extracts up to [`MAX_DAYS`] daily summaries from a city page
#[derive(Debug, Clone, Copy, Default)]
pub struct DailyForecastExtractor;

impl DailyForecastExtractor {
    /// Create a new extractor
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Extract the daily forecast
    ///
    /// Never fails: if the document cannot be walked at all, the result is a
    /// single [`DailyForecastItem::error`] item so callers always have
    /// something to render. A page without any recognised layout yields an
    /// empty list.
    #[must_use]
    pub fn extract(&self, document: &Html) -> Vec<DailyForecastItem> {
        settle(Self::try_extract(document))
    }

    fn try_extract(document: &Html) -> Result<Vec<DailyForecastItem>, ExtractError> {
        let items = Self::from_day_selector(document)?;
        if !items.is_empty() {
            debug!(days = items.len(), "Extracted days from day selector");
            return Ok(items);
        }

        let items = Self::from_table_rows(document)?;
        debug!(days = items.len(), "Extracted days from legacy table rows");
        Ok(items)
    }

    fn from_day_selector(document: &Html) -> Result<Vec<DailyForecastItem>, ExtractError> {
        let list_item = css(DAY_LIST)?;
        let anchor = css("a")?;
        let temperatures = css(DAY_TEMPERATURES)?;
        let icons = IconSelectors::compile()?;

        let mut items = Vec::new();
        for li in document.select(&list_item) {
            if items.len() >= MAX_DAYS {
                break;
            }

            // Day and date may be split over several anchors
            let anchors: Vec<_> = li.select(&anchor).collect();
            let label = anchors
                .iter()
                .map(|a| text_of(*a))
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            // "Meteo giornaliero" and similar entries are not days
            if !label.chars().any(|c| c.is_ascii_digit()) {
                trace!(label = %label, "Skipping day selector entry without a date");
                continue;
            }

            let href = anchors
                .iter()
                .find_map(|a| a.value().attr("href"))
                .map(str::trim)
                .unwrap_or_default();

            let icon = resolve_icon(li, &icons, DAILY_STRATEGIES);

            let temp_text = li
                .select(&temperatures)
                .map(text_of)
                .collect::<Vec<_>>()
                .join(" ");
            let (min_temp, max_temp) = split_min_max(&temp_text);

            items.push(DailyForecastItem {
                day: label.chars().take(DAY_LABEL_CHARS).collect(),
                date: label.clone(),
                icon_ref: icon.icon_ref,
                weather_code: icon.code,
                min_temp,
                max_temp,
                description: label,
                link: href.to_string(),
                failed: false,
            });
        }

        Ok(items)
    }

    fn from_table_rows(document: &Html) -> Result<Vec<DailyForecastItem>, ExtractError> {
        let row = css("tr")?;
        let cell = css("td")?;
        let weather_image = css("img[src*='meteo']")?;

        let mut seen_days = HashSet::new();
        let mut items = Vec::new();

        for tr in document.select(&row) {
            if items.len() >= MAX_DAYS {
                break;
            }

            let text = text_of(tr);
            if !is_daily_row(&text) {
                continue;
            }

            let cells: Vec<String> = tr.select(&cell).map(text_of).collect();
            let first_cell = cells.first().cloned().unwrap_or_default();
            let Some(day_key) = first_cell.split_whitespace().next() else {
                continue;
            };
            if !seen_days.insert(day_key.to_string()) {
                continue;
            }

            let icon_ref = tr
                .select(&weather_image)
                .next()
                .and_then(|img| img.value().attr("src"))
                .map_or_else(|| IconCategory::Sun.icon_url(), normalize_image_src);

            let mut temps = cells.iter().filter(|text| text.contains('°'));
            let min_temp = temps.next();
            let max_temp = temps.last().or(min_temp);

            items.push(DailyForecastItem {
                day: first_cell.clone(),
                date: first_cell,
                icon_ref,
                weather_code: 0,
                min_temp: min_temp.map_or_else(|| UNAVAILABLE.to_string(), Clone::clone),
                max_temp: max_temp.map_or_else(|| UNAVAILABLE.to_string(), Clone::clone),
                description: LEGACY_DESCRIPTION.to_string(),
                link: String::new(),
                failed: false,
            });
        }

        Ok(items)
    }
}

/// Turn an extraction result into what callers see
fn settle(result: Result<Vec<DailyForecastItem>, ExtractError>) -> Vec<DailyForecastItem> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "Daily forecast extraction failed");
            vec![DailyForecastItem::error(e.to_string())]
        },
    }
}

fn is_daily_row(text: &str) -> bool {
    text.contains('°') && DAY_ABBREVIATIONS.iter().any(|day| text.contains(day))
}

/// First token is the minimum, last token the maximum
///
/// A single token fills both fields, as the site does for days with one
/// value.
fn split_min_max(text: &str) -> (String, String) {
    let mut tokens = text.split_whitespace();
    let min = tokens.next().unwrap_or(UNAVAILABLE);
    let max = tokens.last().unwrap_or(min);
    (min.to_string(), max.to_string())
}
