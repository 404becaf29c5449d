//! Pictogram resolution
//!
//! The site has changed how it marks up weather pictograms several times.
//! Each markup generation is covered by one strategy; strategies are tried in
//! order and the first hit wins:
//!
//! 1. numeric `data-simbolo` attribute
//! 2. numeric suffix of an `ss-small<N>` class
//! 3. keyword inside an `s-small` class (`sole`, `pioggia`, ...)
//! 4. raw `<img>` source (daily cards only)

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::{
    codes::{self, IconCategory},
    dom::{class_name, css, normalize_image_src},
    error::ExtractError,
};

#[allow(clippy::expect_used)] // Infallible with a valid static pattern
static CLASS_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ss-small(\d+)").expect("class code regex"));

/// Class-name keywords of the legacy sprite classes
const CLASS_KEYWORDS: &[(&str, IconCategory)] = &[
    ("sole", IconCategory::Sun),
    ("sereno", IconCategory::Sun),
    ("pioggia", IconCategory::Rain),
    ("neve", IconCategory::Snow),
    ("nuvol", IconCategory::Cloud),
    ("nebbia", IconCategory::Fog),
];

/// Resolved pictogram
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IconMatch {
    pub code: i32,
    pub icon_ref: String,
}

impl IconMatch {
    fn from_code(code: i32) -> Self {
        Self {
            code,
            icon_ref: codes::resolve(code).icon_url(),
        }
    }

    fn from_category(category: IconCategory) -> Self {
        Self {
            code: 0,
            icon_ref: category.icon_url(),
        }
    }
}

impl Default for IconMatch {
    fn default() -> Self {
        Self::from_category(IconCategory::Overcast)
    }
}

/// Selectors used by the strategies, compiled once per extraction
#[derive(Debug)]
pub(crate) struct IconSelectors {
    data_code: Selector,
    code_class: Selector,
    sprite_class: Selector,
    image: Selector,
}

impl IconSelectors {
    pub(crate) fn compile() -> Result<Self, ExtractError> {
        Ok(Self {
            data_code: css("[data-simbolo]")?,
            code_class: css("span[class*='ss-small']")?,
            sprite_class: css("span[class*='s-small']")?,
            image: css("img[src]")?,
        })
    }
}

/// One way of finding a pictogram below a scope element
pub(crate) type IconStrategy = fn(ElementRef<'_>, &IconSelectors) -> Option<IconMatch>;

/// Cascade for the day-selector cards
pub(crate) const DAILY_STRATEGIES: &[IconStrategy] = &[
    from_data_attribute,
    from_class_suffix,
    from_class_keyword,
    from_image_source,
];

/// Cascade for the icon cell of the hourly table
pub(crate) const HOURLY_STRATEGIES: &[IconStrategy] =
    &[from_data_attribute, from_class_suffix, from_class_keyword];

/// Run a cascade, falling back to the overcast pictogram with code 0
pub(crate) fn resolve_icon(
    scope: ElementRef<'_>,
    selectors: &IconSelectors,
    strategies: &[IconStrategy],
) -> IconMatch {
    strategies
        .iter()
        .find_map(|strategy| strategy(scope, selectors))
        .unwrap_or_default()
}

fn positive_code(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok().filter(|code| *code > 0)
}

fn from_data_attribute(scope: ElementRef<'_>, selectors: &IconSelectors) -> Option<IconMatch> {
    scope
        .select(&selectors.data_code)
        .next()
        .and_then(|el| el.value().attr("data-simbolo"))
        .and_then(positive_code)
        .map(IconMatch::from_code)
}

fn from_class_suffix(scope: ElementRef<'_>, selectors: &IconSelectors) -> Option<IconMatch> {
    let span = scope.select(&selectors.code_class).next()?;
    CLASS_CODE_RE
        .captures(class_name(&span))
        .and_then(|caps| caps.get(1))
        .and_then(|m| positive_code(m.as_str()))
        .map(IconMatch::from_code)
}

fn from_class_keyword(scope: ElementRef<'_>, selectors: &IconSelectors) -> Option<IconMatch> {
    let span = scope.select(&selectors.sprite_class).next()?;
    let classes = class_name(&span);
    CLASS_KEYWORDS
        .iter()
        .find(|(keyword, _)| classes.contains(keyword))
        .map(|(_, category)| IconMatch::from_category(*category))
}

fn from_image_source(scope: ElementRef<'_>, selectors: &IconSelectors) -> Option<IconMatch> {
    scope
        .select(&selectors.image)
        .filter_map(|img| img.value().attr("src"))
        .find(|src| !src.trim().is_empty())
        .map(|src| IconMatch {
            code: 0,
            icon_ref: normalize_image_src(src),
        })
}
