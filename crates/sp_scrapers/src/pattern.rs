//! Pattern-based field extraction for feeds only available as raw text.
//!
//! When a feed is fetched through the rendering engine the XML arrives as
//! undifferentiated page text, so items are located with a block pattern
//! and fields with per-tag sub-patterns. Matching is case-insensitive,
//! spans lines, and tolerates an optional CDATA wrapper around text fields.

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use regex::Regex;

static ITEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<item[\s>].*?</item>").unwrap());

static FIELD_CACHE: Lazy<Mutex<HashMap<String, Regex>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn field_regex(tag: &str) -> Regex {
    let mut cache = FIELD_CACHE.lock().expect("field regex cache poisoned");
    cache
        .entry(tag.to_string())
        .or_insert_with(|| {
            let tag = regex::escape(tag);
            Regex::new(&format!(
                r"(?is)<{tag}(?:\s[^>]*)?>\s*(?:<!\[CDATA\[)?(.*?)(?:\]\]>)?\s*</{tag}>"
            ))
            .expect("generated field pattern is valid")
        })
        .clone()
}

fn attr_regex(tag: &str, attr: &str) -> Regex {
    let key = format!("{tag}@{attr}");
    let mut cache = FIELD_CACHE.lock().expect("field regex cache poisoned");
    cache
        .entry(key)
        .or_insert_with(|| {
            let tag = regex::escape(tag);
            let attr = regex::escape(attr);
            Regex::new(&format!(r#"(?is)<{tag}\s[^>]*{attr}\s*=\s*"([^"]*)""#))
                .expect("generated attribute pattern is valid")
        })
        .clone()
}

/// Repeated `<item>...</item>` blocks of a feed document.
pub fn item_blocks(text: &str) -> Vec<&str> {
    ITEM_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Content of the first `<tag>` element in `block`, CDATA unwrapped and
/// trimmed. Returns `None` for absent or empty fields.
pub fn text_field(block: &str, tag: &str) -> Option<String> {
    field_regex(tag)
        .captures(block)
        .map(|caps| caps[1].trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Contents of every `<tag>` element in `block`, in document order.
pub fn text_fields(block: &str, tag: &str) -> Vec<String> {
    field_regex(tag)
        .captures_iter(block)
        .map(|caps| caps[1].trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

/// Value of `attr` on the first `<tag ...>` element in `block`.
pub fn attr_field(block: &str, tag: &str, attr: &str) -> Option<String> {
    attr_regex(tag, attr)
        .captures(block)
        .map(|caps| caps[1].to_string())
        .filter(|value| !value.is_empty())
}
