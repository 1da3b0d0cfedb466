//! Markup cleanup used by every extractor: tag stripping, entity decoding,
//! CDATA removal, whitespace normalization.
//!
//! All functions are best-effort and never fail: unbalanced or otherwise
//! broken markup degrades to whatever text can be salvaged.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<script\b.*?</script>").unwrap());
static STYLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<style\b.*?</style>").unwrap());
static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static PARA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<p\b[^>]*>").unwrap());
static BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static IMG_SRC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"src="([^"]+)""#).unwrap());
static HSPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static NEWLINE_PAD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" ?\n ?").unwrap());
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Convert an HTML fragment to plain text.
///
/// Scripts and styles are dropped with their contents, `<p>` becomes a
/// paragraph break and `<br>` a line break before the remaining tags are
/// stripped, then entities are decoded and whitespace collapsed.
pub fn strip_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let text = SCRIPT_RE.replace_all(html, "");
    let text = STYLE_RE.replace_all(&text, "");
    let text = COMMENT_RE.replace_all(&text, "");

    // Structure-preserving conversions must run before the generic tag
    // strip, which is lossy.
    let text = PARA_RE.replace_all(&text, "\n\n");
    let text = BREAK_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, "");

    let text = decode_entities(&text);

    let text = HSPACE_RE.replace_all(&text, " ");
    let text = NEWLINE_PAD_RE.replace_all(&text, "\n");
    let text = BLANK_RUN_RE.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Decode the small entity set feeds actually emit.
///
/// `&amp;` is decoded last so it cannot combine with neighbouring text into
/// a second round of entities.
pub fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Remove CDATA wrapper markers, leaving the payload intact.
pub fn strip_cdata(text: &str) -> String {
    text.replace("<![CDATA[", "")
        .replace("[CDATA[", "")
        .replace("]]>", "")
}

/// Collapse all whitespace runs to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Opportunistically pull the first `src="..."` attribute out of raw
/// markup. Used when a source has no structured image field but inlines an
/// `<img>` in its description.
pub fn sniff_image_src(html: &str) -> Option<String> {
    IMG_SRC_RE
        .captures(html)
        .map(|caps| caps[1].to_string())
        .filter(|src| !src.is_empty())
}
