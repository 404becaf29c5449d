//! Hourly forecast extraction
//!
//! Reads the hour-by-hour table of a day's detail page. Overnight hours are
//! sometimes rendered in a separate table, so every `tr` of the document is
//! considered and rows are accepted on shape alone: enough cells and a time
//! label in the first one.
//!
//! The last column depends on the station: inland stations show relative
//! humidity (`UR%`), seaside ones the perceived temperature. Its meaning is
//! read from the table header once per document.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace, warn};

use crate::{
    dom::{css, has_any_class, text_of},
    error::ExtractError,
    icon::{HOURLY_STRATEGIES, IconSelectors, resolve_icon},
    models::{HourlyForecastItem, HumidityLabel, RainType, UNAVAILABLE},
};

const HEADER_CELLS: &str = "table.weather_table thead tr th";

/// Rows with fewer cells are not hour slots
const MIN_CELLS: usize = 6;

/// Column read when the header does not name the dynamic column
const CONVENTIONAL_HUMIDITY_COLUMN: usize = 9;

const HIDDEN_ROW_CLASSES: &[&str] = &["hidden", "ad_row", "separator"];

// Fixed cell positions; cell 4 only holds a wind icon.
const TIME_CELL: usize = 0;
const ICON_CELL: usize = 1;
const TEMP_CELL: usize = 2;
const RAIN_CELL: usize = 3;
const WIND_CELL: usize = 5;

#[allow(clippy::expect_used)] // Infallible with a valid static pattern
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2}:\d{2})").expect("time regex"));

/// Extract the time label of an hourly row
///
/// `H:MM`/`HH:MM` anywhere in the text wins; otherwise a bare 1–2 digit hour
/// is kept exactly as written. Anything else is not an hourly row.
#[must_use]
pub fn parse_time_label(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Some(m) = TIME_RE.find(raw) {
        return Some(m.as_str().to_string());
    }

    let bare_hour = !raw.is_empty() && raw.len() <= 2 && raw.chars().all(|c| c.is_ascii_digit());
    bare_hour.then(|| raw.to_string())
}

/// Where the station-dependent last column is found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastColumn {
    /// Named by a header cell
    Header {
        index: usize,
        label: HumidityLabel,
    },
    /// Header did not say; assume humidity in the conventional column
    Conventional,
}

impl LastColumn {
    fn detect(document: &Html, header: &Selector) -> Self {
        document
            .select(header)
            .enumerate()
            .find_map(|(index, th)| {
                Self::label_for_header(&text_of(th)).map(|label| Self::Header { index, label })
            })
            .unwrap_or(Self::Conventional)
    }

    fn label_for_header(text: &str) -> Option<HumidityLabel> {
        let lower = text.to_lowercase();
        if lower.contains("ur") {
            Some(HumidityLabel::HumidityPercent)
        } else if lower.contains("perc") || lower.contains("t.p.") {
            Some(HumidityLabel::PerceivedTemperature)
        } else {
            None
        }
    }

    const fn label(&self) -> HumidityLabel {
        match self {
            Self::Header { label, .. } => *label,
            Self::Conventional => HumidityLabel::HumidityPercent,
        }
    }

    fn read(&self, cells: &[ElementRef<'_>]) -> String {
        let header_cell = match *self {
            Self::Header { index, label } => cells.get(index).map(|cell| (*cell, label)),
            Self::Conventional => None,
        };

        if let Some((cell, label)) = header_cell {
            let mut value = text_of(cell);
            if !value.contains(label.unit()) {
                value.push(label.unit());
            }
            return value;
        }

        // No header, or a row shorter than the header: guess humidity
        cells
            .get(CONVENTIONAL_HUMIDITY_COLUMN)
            .map_or_else(|| UNAVAILABLE.to_string(), |cell| format!("{}%", text_of(*cell)))
    }
}

#[derive(Debug)]
struct RowSelectors {
    row: Selector,
    cell: Selector,
    snow_marker: Selector,
    precipitation_marker: Selector,
    icons: IconSelectors,
}

impl RowSelectors {
    fn compile() -> Result<Self, ExtractError> {
        Ok(Self {
            row: css("tr")?,
            cell: css("td")?,
            snow_marker: css(".fiocco")?,
            precipitation_marker: css(".precontainer")?,
            icons: IconSelectors::compile()?,
        })
    }
}

/// Extracts hour slots from a day's detail page
#[derive(Debug, Clone, Copy, Default)]
pub struct HourlyForecastExtractor;

impl HourlyForecastExtractor {
    /// Create a new extractor
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Extract the hourly forecast in document row order
    ///
    /// Never fails: a document that cannot be walked yields an empty list,
    /// which is also what a page without an hourly table produces.
    #[must_use]
    pub fn extract(&self, document: &Html) -> Vec<HourlyForecastItem> {
        match Self::try_extract(document) {
            Ok(items) => {
                debug!(hours = items.len(), "Extracted hourly forecast");
                items
            },
            Err(e) => {
                warn!(error = %e, "Hourly forecast extraction failed");
                Vec::new()
            },
        }
    }

    fn try_extract(document: &Html) -> Result<Vec<HourlyForecastItem>, ExtractError> {
        let last_column = LastColumn::detect(document, &css(HEADER_CELLS)?);
        debug!(column = ?last_column, "Resolved dynamic column");

        let selectors = RowSelectors::compile()?;

        Ok(document
            .select(&selectors.row)
            .filter(|row| !is_hidden(row))
            .filter_map(|row| Self::read_row(row, &selectors, last_column))
            .collect())
    }

    fn read_row(
        row: ElementRef<'_>,
        selectors: &RowSelectors,
        last_column: LastColumn,
    ) -> Option<HourlyForecastItem> {
        let cells: Vec<ElementRef<'_>> = row.select(&selectors.cell).collect();
        if cells.len() < MIN_CELLS {
            return None;
        }

        let raw_time = text_of(cells[TIME_CELL]);
        let Some(time) = parse_time_label(&raw_time) else {
            trace!(cell = %raw_time, "Skipping row without a time label");
            return None;
        };

        let icon = resolve_icon(cells[ICON_CELL], &selectors.icons, HOURLY_STRATEGIES);
        let rain_cell = cells[RAIN_CELL];
        let rain = text_of(rain_cell);
        let rain_type = classify_rain(rain_cell, &rain, selectors);

        Some(HourlyForecastItem {
            time,
            icon_ref: icon.icon_ref,
            weather_code: icon.code,
            temp: text_of(cells[TEMP_CELL]),
            rain,
            rain_type,
            wind: text_of(cells[WIND_CELL]),
            snow_level: UNAVAILABLE.to_string(),
            air_quality: UNAVAILABLE.to_string(),
            visibility: UNAVAILABLE.to_string(),
            humidity_value: last_column.read(&cells),
            humidity_label: last_column.label(),
        })
    }
}

fn is_hidden(row: &ElementRef<'_>) -> bool {
    let style = row.value().attr("style").unwrap_or("");
    style.contains("display: none")
        || style.contains("display:none")
        || has_any_class(row, HIDDEN_ROW_CLASSES)
}

/// Snowflake marker beats everything; then precipitation markup or text
fn classify_rain(cell: ElementRef<'_>, text: &str, selectors: &RowSelectors) -> RainType {
    if cell.select(&selectors.snow_marker).next().is_some() {
        return RainType::Snow;
    }

    let has_amount = cell.select(&selectors.precipitation_marker).next().is_some();
    if has_amount || text.contains("mm") || text.contains("pioggia") || text.contains("rain") {
        return RainType::Rain;
    }

    RainType::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::IconCategory;

    fn hour_row(time: &str, icon: &str, rain: &str, last: &str) -> String {
        format!(
            "<tr><td>{time}</td><td>{icon}</td><td>8°</td><td>{rain}</td>\
             <td><span class=\"vento\"></span></td><td>W 5 km/h</td>\
             <td>1500 m</td><td>buona</td><td>10 km</td><td>{last}</td></tr>"
        )
    }

    fn detail_page(header_last: &str, rows: &[String], extra: &str) -> Html {
        Html::parse_document(&format!(
            "<html><body>\
             <table class=\"weather_table\"><thead><tr>\
             <th>Ora</th><th>Tempo</th><th>Temp</th><th>Precip.</th><th></th>\
             <th>Vento</th><th>Quota 0°</th><th>Aria</th><th>Visib.</th><th>{header_last}</th>\
             </tr></thead><tbody>{}</tbody></table>{extra}</body></html>",
            rows.concat()
        ))
    }

    #[test]
    fn test_parse_time_label() {
        assert_eq!(parse_time_label("14:00 update"), Some("14:00".to_string()));
        assert_eq!(parse_time_label("ore 7:30"), Some("7:30".to_string()));
        assert_eq!(parse_time_label("3"), Some("3".to_string()));
        assert_eq!(parse_time_label(" 23 "), Some("23".to_string()));
        assert_eq!(parse_time_label("abc"), None);
        assert_eq!(parse_time_label("123"), None);
        assert_eq!(parse_time_label("3a"), None);
        assert_eq!(parse_time_label(""), None);
    }

    #[test]
    fn test_humidity_header_detected() {
        let page = detail_page("UR%", &[hour_row("14:00", "", "assenti", "60")], "");
        let items = HourlyForecastExtractor::new().extract(&page);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].humidity_value, "60%");
        assert_eq!(items[0].humidity_label, HumidityLabel::HumidityPercent);
    }

    #[test]
    fn test_percent_not_duplicated() {
        let page = detail_page("UR", &[hour_row("14:00", "", "", "75%")], "");
        let items = HourlyForecastExtractor::new().extract(&page);
        assert_eq!(items[0].humidity_value, "75%");
    }

    #[test]
    fn test_perceived_temperature_header() {
        let page = detail_page(
            "T. percepita",
            &[hour_row("9:00", "", "", "4"), hour_row("10:00", "", "", "5°")],
            "",
        );
        let items = HourlyForecastExtractor::new().extract(&page);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].humidity_value, "4°");
        assert_eq!(items[0].humidity_label, HumidityLabel::PerceivedTemperature);
        assert_eq!(items[1].humidity_value, "5°");
    }

    #[test]
    fn test_conventional_column_without_header() {
        let page = Html::parse_document(&format!(
            "<table>{}{}</table>",
            hour_row("12:00", "", "", "55"),
            "<tr><td>13:00</td><td></td><td>9°</td><td></td><td></td><td>N 3 km/h</td></tr>"
        ));
        let items = HourlyForecastExtractor::new().extract(&page);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].humidity_value, "55%");
        assert_eq!(items[0].humidity_label, HumidityLabel::HumidityPercent);
        assert_eq!(items[1].humidity_value, "--");
    }

    #[test]
    fn test_header_beyond_row_reads_conventional_column() {
        let page = Html::parse_document(&format!(
            "<table class=\"weather_table\"><thead><tr>\
             <th>Ora</th><th>Tempo</th><th>Temp</th><th>Precip.</th><th></th>\
             <th>Vento</th><th>Quota 0°</th><th>Aria</th><th>Visib.</th><th></th><th>UR%</th>\
             </tr></thead><tbody>{}</tbody></table>",
            hour_row("14:00", "", "", "55")
        ));
        let items = HourlyForecastExtractor::new().extract(&page);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].humidity_value, "55%");
        assert_eq!(items[0].humidity_label, HumidityLabel::HumidityPercent);
    }

    #[test]
    fn test_short_row_without_conventional_column() {
        let page = Html::parse_document(
            "<table class=\"weather_table\"><thead><tr>\
             <th>Ora</th><th>Tempo</th><th>Temp</th><th>Precip.</th><th></th>\
             <th>Vento</th><th>Quota 0°</th><th>Aria</th><th>Visib.</th><th>UR%</th>\
             </tr></thead><tbody>\
             <tr><td>13:00</td><td></td><td>9°</td><td></td><td></td><td>N 3 km/h</td></tr>\
             </tbody></table>",
        );
        let items = HourlyForecastExtractor::new().extract(&page);

        assert_eq!(items[0].humidity_value, "--");
        assert_eq!(items[0].humidity_label, HumidityLabel::HumidityPercent);
    }

    #[test]
    fn test_row_selection() {
        let rows = [
            hour_row("14:00", "", "", "60"),
            hour_row("abc", "", "", "60"),
            "<tr style=\"display: none\"><td>15:00</td><td></td><td></td><td></td><td></td><td></td></tr>"
                .to_string(),
            "<tr class=\"ad_row\"><td>16:00</td><td></td><td></td><td></td><td></td><td></td></tr>"
                .to_string(),
            "<tr><td>17:00</td><td></td><td>9°</td><td></td><td></td></tr>".to_string(),
            hour_row("18:00", "", "", "61"),
        ];
        // Overnight hours rendered after the main table
        let overnight = format!("<table class=\"notte\">{}</table>", hour_row("1", "", "", "70"));
        let page = detail_page("UR%", &rows, &overnight);

        let times: Vec<String> = HourlyForecastExtractor::new()
            .extract(&page)
            .into_iter()
            .map(|item| item.time)
            .collect();
        assert_eq!(times, ["14:00", "18:00", "1"]);
    }

    #[test]
    fn test_fields_and_icon() {
        let page = detail_page(
            "UR%",
            &[hour_row(
                "06:00",
                "<span class=\"s-small\" data-simbolo=\"19\"></span>",
                "3 mm",
                "90",
            )],
            "",
        );
        let item = &HourlyForecastExtractor::new().extract(&page)[0];

        assert_eq!(item.time, "06:00");
        assert_eq!(item.weather_code, 19);
        assert_eq!(item.icon_ref, IconCategory::Storm.icon_url());
        assert_eq!(item.temp, "8°");
        assert_eq!(item.rain, "3 mm");
        assert_eq!(item.rain_type, RainType::Rain);
        assert_eq!(item.wind, "W 5 km/h");
        assert_eq!(item.snow_level, "--");
        assert_eq!(item.air_quality, "--");
        assert_eq!(item.visibility, "--");
    }

    #[test]
    fn test_default_icon() {
        let page = detail_page("UR%", &[hour_row("06:00", "", "", "90")], "");
        let item = &HourlyForecastExtractor::new().extract(&page)[0];
        assert_eq!(item.weather_code, 0);
        assert_eq!(item.icon_ref, IconCategory::Overcast.icon_url());
    }

    #[test]
    fn test_rain_classification() {
        let rows = [
            hour_row("1:00", "", "<span class=\"fiocco\"></span> 2 mm", "1"),
            hour_row("2:00", "", "2 mm", "1"),
            hour_row("3:00", "", "<div class=\"precontainer\"><i></i></div>deboli", "1"),
            hour_row("4:00", "", "pioggia debole", "1"),
            hour_row("5:00", "", "assenti", "1"),
        ];
        let kinds: Vec<RainType> = HourlyForecastExtractor::new()
            .extract(&detail_page("UR%", &rows, ""))
            .into_iter()
            .map(|item| item.rain_type)
            .collect();

        assert_eq!(
            kinds,
            [
                RainType::Snow,
                RainType::Rain,
                RainType::Rain,
                RainType::Rain,
                RainType::None
            ]
        );
    }

    #[test]
    fn test_page_without_table_is_empty() {
        let page = Html::parse_document("<html><body><h1>Errore 404</h1></body></html>");
        assert!(HourlyForecastExtractor::new().extract(&page).is_empty());
    }

    #[test]
    fn test_label_for_header() {
        assert_eq!(
            LastColumn::label_for_header("ur%"),
            Some(HumidityLabel::HumidityPercent)
        );
        assert_eq!(
            LastColumn::label_for_header("T.p."),
            Some(HumidityLabel::PerceivedTemperature)
        );
        assert_eq!(LastColumn::label_for_header("Vento"), None);
    }
}
