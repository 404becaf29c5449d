//! Small helpers over the `scraper` DOM

use scraper::{ElementRef, Selector};

use crate::error::ExtractError;

/// Compile a CSS selector
pub(crate) fn css(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Text content of an element with whitespace collapsed and trimmed
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Collapse runs of whitespace (including `&nbsp;`) into single spaces
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Raw `class` attribute, empty when absent
pub(crate) fn class_name<'a>(element: &ElementRef<'a>) -> &'a str {
    element.value().attr("class").unwrap_or("")
}

/// Whether the element carries any of the given classes
pub(crate) fn has_any_class(element: &ElementRef<'_>, classes: &[&str]) -> bool {
    element.value().classes().any(|c| classes.contains(&c))
}

/// Make an image source usable outside the page
///
/// Protocol-relative sources (`//host/path`) get an `https:` scheme; an
/// explicit `http:`/`https:` scheme is normalized to `https:`.
pub(crate) fn normalize_image_src(src: &str) -> String {
    let src = src.trim();
    let stripped = src
        .strip_prefix("https:")
        .or_else(|| src.strip_prefix("http:"))
        .unwrap_or(src);

    if stripped.starts_with("//") {
        format!("https:{stripped}")
    } else {
        src.to_string()
    }
}
