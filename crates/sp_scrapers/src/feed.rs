//! Feed-XML extraction.
//!
//! Feeds in the wild ship malformed entities, stray markup inside
//! descriptions, and the occasional broken item. The document is therefore
//! split into per-item chunks first and each chunk is parsed with its own
//! XML reader: one mangled item is skipped with a warning while the rest of
//! the feed survives.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::warn;

use sp_core::{Error, RawItem, Result};

use crate::pattern;

/// Parse an RSS document into raw items.
///
/// A document without a recognizable channel/item structure yields an empty
/// list and a warning, never an error.
pub fn parse_feed(xml: &str) -> Vec<RawItem> {
    let chunks = pattern::item_blocks(xml);
    if chunks.is_empty() {
        warn!("feed has no item elements, skipping");
        return Vec::new();
    }

    let mut items = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        match parse_item(chunk) {
            Ok(item) => items.push(item),
            Err(e) => warn!(index, error = %e, "skipping malformed feed item"),
        }
    }
    items
}

/// Parse one `<item>` chunk.
///
/// Field text accumulates across `Text` and `CData` events so split
/// payloads (entity-separated text nodes) come through whole.
pub fn parse_item(chunk: &str) -> Result<RawItem> {
    let mut reader = Reader::from_str(chunk);
    reader.config_mut().trim_text(true);

    let mut item = RawItem::default();
    let mut current: Option<Vec<u8>> = None;
    let mut buffer = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                capture_media_url(&mut item, e);
                // A tag opened inside a field (e.g. <b> in a description) is
                // inline markup: keep accumulating into the same field.
                if current.is_none() && e.name().as_ref() != b"item" {
                    current = Some(e.name().as_ref().to_vec());
                    buffer.clear();
                }
            }
            Ok(Event::Empty(ref e)) => {
                capture_media_url(&mut item, e);
            }
            Ok(Event::Text(ref e)) => {
                if current.is_some() {
                    let text = e
                        .unescape()
                        .map(|s| s.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(e.as_ref()).into_owned());
                    // The reader trims text nodes; restore the gap between
                    // nodes split by inline markup.
                    if !buffer.is_empty() && !text.is_empty() {
                        buffer.push(' ');
                    }
                    buffer.push_str(&text);
                }
            }
            Ok(Event::CData(ref e)) => {
                if current.is_some() {
                    buffer.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::End(ref e)) => {
                if current.as_deref() == Some(e.name().as_ref()) {
                    commit_field(&mut item, e.name().as_ref(), buffer.trim());
                    current = None;
                    buffer.clear();
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Parse(format!("malformed feed item: {e}"))),
            _ => {}
        }
    }

    Ok(item)
}

fn commit_field(item: &mut RawItem, name: &[u8], value: &str) {
    if value.is_empty() {
        return;
    }
    match name {
        b"title" => item.title = Some(value.to_string()),
        b"link" => item.link = Some(value.to_string()),
        b"description" => item.description = Some(value.to_string()),
        b"content:encoded" => item.content = Some(value.to_string()),
        b"pubDate" => item.pub_date = Some(value.to_string()),
        b"dc:creator" => item.author = Some(value.to_string()),
        b"category" => item.categories.push(value.to_string()),
        b"guid" => {
            item.metadata
                .insert("guid".to_string(), value.to_string().into());
        }
        _ => {}
    }
}

/// `media:content`, `media:thumbnail` and `enclosure` carry the image as a
/// `url` attribute; the first one found wins.
fn capture_media_url(item: &mut RawItem, element: &BytesStart) {
    if item.image_url.is_some() {
        return;
    }
    let name = element.name();
    if !matches!(
        name.as_ref(),
        b"media:content" | b"media:thumbnail" | b"enclosure"
    ) {
        return;
    }
    for attr in element.attributes().flatten() {
        if attr.key.as_ref() == b"url" {
            let url = String::from_utf8_lossy(&attr.value).into_owned();
            if !url.is_empty() {
                item.image_url = Some(url);
            }
        }
    }
}
