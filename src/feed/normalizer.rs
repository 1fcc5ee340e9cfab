//! Maps the generic XML tree onto the canonical [`Feed`] model.
//!
//! RSS 2.0 and Atom disagree on almost every tag name, so every canonical
//! field is resolved through an ordered candidate list, first match wins:
//!
//! | Canonical        | Candidates (in order)                    | Default          |
//! |------------------|------------------------------------------|------------------|
//! | feed title       | `channel.title`, `feed.title`            | `"RSS Feed"`     |
//! | feed description | `channel.description`, `feed.subtitle`   | `""`             |
//! | feed link        | `link@href`, `link`                      | `""`             |
//! | last build date  | `lastBuildDate`, `updated`               | now (RFC 3339)   |
//! | entry id         | `guid`, `id`, `link`, content hash       | — (always set)   |
//! | entry title      | `title`                                  | `"Untitled"`     |
//! | entry body       | `description`, `summary`, `content`      | `""`             |
//! | entry link       | `link@href`, `link`, `guid`              | `""`             |
//! | published        | `pubDate`, `published`, `updated`        | now (RFC 3339)   |
//! | author           | `author.name`, `author`, `dc:creator`    | absent           |
//! | categories       | `category`                               | absent           |
//!
//! Candidates that resolve to an empty string are treated as absent and the
//! chain moves on. Every extracted value passes through one explicit
//! string-coercion step, so nothing but strings ever reaches the model.

use super::model::{Categories, Feed, FeedEntry};
use super::FeedError;
use crate::xml::{XmlValue, TEXT_KEY};
use chrono::Utc;
use sha2::{Digest, Sha256};

/// Normalizes a parsed XML document into a [`Feed`].
///
/// The document is RSS shaped when the root holds an `<rss>` element with a
/// `<channel>` child, Atom shaped when it holds a `<feed>` element
/// directly.
///
/// # Errors
///
/// Returns [`FeedError::InvalidFormat`] when neither shape is present.
/// Missing or malformed individual fields never fail; they default per the
/// module table.
pub fn normalize_feed(doc: &XmlValue) -> Result<Feed, FeedError> {
    let channel = doc
        .get("rss")
        .and_then(|rss| rss.get("channel"))
        .or_else(|| doc.get("feed"))
        .ok_or(FeedError::InvalidFormat)?;

    let entries: Vec<FeedEntry> = entry_nodes(channel)
        .into_iter()
        .map(normalize_entry)
        .collect();

    tracing::debug!(entries = entries.len(), "normalized feed");

    Ok(Feed {
        title: text_of(channel, "title").unwrap_or_else(|| "RSS Feed".to_string()),
        description: text_of(channel, "description")
            .or_else(|| text_of(channel, "subtitle"))
            .unwrap_or_default(),
        link: link_of(channel).unwrap_or_default(),
        last_build_date: text_of(channel, "lastBuildDate")
            .or_else(|| text_of(channel, "updated"))
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
        entries,
    })
}

/// Collects the entry elements of a channel/feed in document order.
///
/// A feed with a single `<item>` parses to a scalar rather than a list; it
/// is promoted to a one-element sequence here so single-entry and
/// multi-entry feeds produce identical structure.
fn entry_nodes(channel: &XmlValue) -> Vec<&XmlValue> {
    match channel.get("item").or_else(|| channel.get("entry")) {
        Some(XmlValue::List(items)) => items.iter().collect(),
        Some(single) => vec![single],
        None => Vec::new(),
    }
}

fn normalize_entry(item: &XmlValue) -> FeedEntry {
    let title = text_of(item, "title").unwrap_or_else(|| "Untitled".to_string());
    let description = text_of(item, "description")
        .or_else(|| text_of(item, "summary"))
        .or_else(|| text_of(item, "content"))
        .unwrap_or_default();
    let link = link_of(item)
        .or_else(|| text_of(item, "guid"))
        .unwrap_or_default();
    let published_at = text_of(item, "pubDate")
        .or_else(|| text_of(item, "published"))
        .or_else(|| text_of(item, "updated"))
        .unwrap_or_else(|| Utc::now().to_rfc3339());
    let id = text_of(item, "guid")
        .or_else(|| text_of(item, "id"))
        .or_else(|| Some(link.clone()).filter(|l| !l.is_empty()))
        .unwrap_or_else(|| fallback_id(&link, &title, &published_at));

    FeedEntry {
        id,
        title,
        description,
        link,
        published_at,
        author: author_of(item),
        categories: categories_of(item),
    }
}

/// Coerces any tree node to a string: text scalars directly, composite
/// elements via their reserved text key, lists via their first element.
fn coerce_string(value: &XmlValue) -> String {
    match value {
        XmlValue::Text(s) => s.clone(),
        XmlValue::Element(_) => value
            .get(TEXT_KEY)
            .map(coerce_string)
            .unwrap_or_default(),
        XmlValue::List(items) => items.first().map(coerce_string).unwrap_or_default(),
    }
}

/// Text-or-scalar resolution for one field. Empty results count as absent
/// so candidate chains fall through.
fn text_of(parent: &XmlValue, key: &str) -> Option<String> {
    let value = coerce_string(parent.get(key)?);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Resolves a `<link>`: Atom writes the URL as an `href` attribute, RSS as
/// element text. The permalink-guid fallback is entry-only and lives in
/// [`normalize_entry`]; channels resolve through this function alone.
fn link_of(parent: &XmlValue) -> Option<String> {
    let link = parent.get("link")?;
    // Multiple Atom <link> elements: take the first
    let link = match link {
        XmlValue::List(items) => items.first().unwrap_or(link),
        other => other,
    };
    let value = link
        .attr("href")
        .map(str::to_string)
        .unwrap_or_else(|| coerce_string(link));
    Some(value).filter(|l| !l.is_empty())
}

/// Resolves an author: Atom nests a `<name>` inside `<author>`, RSS puts
/// an address in the element text, Dublin Core uses `<dc:creator>`.
fn author_of(item: &XmlValue) -> Option<String> {
    item.get("author")
        .map(|author| {
            author
                .get("name")
                .map(coerce_string)
                .unwrap_or_else(|| coerce_string(author))
        })
        .filter(|name| !name.is_empty())
        .or_else(|| text_of(item, "dc:creator"))
}

/// Resolves categories preserving source cardinality: one `<category>`
/// stays a single string, repeated elements become a sequence.
fn categories_of(item: &XmlValue) -> Option<Categories> {
    match item.get("category")? {
        XmlValue::List(values) => Some(Categories::Many(
            values.iter().map(coerce_string).collect(),
        )),
        single => {
            let value = coerce_string(single);
            if value.is_empty() {
                None
            } else {
                Some(Categories::One(value))
            }
        }
    }
}

/// Deterministic identifier for entries that carry no guid, id, or link:
/// a SHA-256 over the fields that are present. Stable across fetches of
/// the same content, never empty.
fn fallback_id(link: &str, title: &str, published_at: &str) -> String {
    let hash = Sha256::digest(format!("{link}|{title}|{published_at}").as_bytes());
    format!("{hash:x}")
}
