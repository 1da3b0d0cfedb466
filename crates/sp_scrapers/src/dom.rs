//! Selector-chain extraction over rendered pages.
//!
//! Pages not under our control drift; every field lookup is therefore an
//! ordered list of selectors tried until one yields non-empty output, with
//! a generic long-paragraph fallback as the last resort for body text. The
//! chains are plain data so resilience rules can be added without touching
//! control flow.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::clean;

/// Text of the first element matched by the first selector that produces a
/// non-empty result.
pub fn first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    first_text_in(&document.root_element(), selectors)
}

/// Same as [`first_text`], scoped to an element.
pub fn first_text_in(scope: &ElementRef, selectors: &[&str]) -> Option<String> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            warn!(selector = raw, "skipping invalid selector");
            continue;
        };
        if let Some(element) = scope.select(&selector).next() {
            let text = element_text(&element);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// First non-empty value of `attr` across the selector chain.
pub fn first_attr(document: &Html, selectors: &[&str], attr: &str) -> Option<String> {
    first_attr_in(&document.root_element(), selectors, attr)
}

/// Same as [`first_attr`], scoped to an element.
pub fn first_attr_in(scope: &ElementRef, selectors: &[&str], attr: &str) -> Option<String> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            warn!(selector = raw, "skipping invalid selector");
            continue;
        };
        for element in scope.select(&selector) {
            if let Some(value) = element.value().attr(attr) {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// Texts of every element matching `selector`, empties dropped.
pub fn all_text(document: &Html, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Generic last-resort body extraction: join every paragraph whose text is
/// longer than `min_len` characters.
pub fn paragraphs_fallback(document: &Html, min_len: usize) -> Option<String> {
    let selector = Selector::parse("p").expect("p is a valid selector");
    let paragraphs: Vec<String> = document
        .select(&selector)
        .map(|el| element_text(&el))
        .filter(|text| text.len() > min_len)
        .collect();

    if paragraphs.is_empty() {
        None
    } else {
        Some(paragraphs.join("\n\n"))
    }
}

/// Collapsed text content of an element and its descendants.
pub fn element_text(element: &ElementRef) -> String {
    clean::collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}
