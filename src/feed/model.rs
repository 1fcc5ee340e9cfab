use serde::Serialize;

/// Category labels attached to an entry, mirroring source cardinality:
/// a source with one `<category>` yields [`Categories::One`], repeated
/// elements yield [`Categories::Many`] in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Categories {
    One(String),
    Many(Vec<String>),
}

/// One syndication entry in canonical form, regardless of whether the
/// source was RSS 2.0 (`<item>`) or Atom (`<entry>`).
///
/// Every required field is populated on construction — missing source
/// fields are defaulted, never left absent. All values are the raw strings
/// the source provided (after entity unescaping); `description` in
/// particular may contain markup, which callers strip at display time with
/// [`strip_markup`](crate::util::strip_markup).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEntry {
    /// Stable identifier within one fetch. Sourced from `guid`/`id`/`link`,
    /// falling back to a content hash when all of those are absent.
    pub id: String,
    /// Entry headline. `"Untitled"` when the source omits it.
    pub title: String,
    /// Body or summary text, possibly containing raw markup. Empty string
    /// when absent.
    pub description: String,
    /// Canonical URL of the entry. Empty string when absent.
    pub link: String,
    /// Publication timestamp exactly as the source wrote it (RFC 2822 for
    /// RSS, RFC 3339 for Atom, or anything else the publisher emitted).
    /// Defaults to the current time in RFC 3339 when absent.
    pub published_at: String,
    /// Entry author, when the source names one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Category labels, when the source carries any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Categories>,
}

/// A normalized feed: channel-level metadata plus its entries in source
/// document order. Built fresh on every fetch; nothing is cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feed {
    /// Feed title. `"RSS Feed"` when the source omits it.
    pub title: String,
    /// Feed description (Atom: `subtitle`). Empty string when absent.
    pub description: String,
    /// Website URL of the feed. Empty string when absent.
    pub link: String,
    /// Last-built timestamp (Atom: `updated`), verbatim from the source.
    /// Defaults to the current time in RFC 3339 when absent.
    pub last_build_date: String,
    /// Entries in the order the source document listed them. Same length
    /// as the source's item/entry count — nothing is dropped or deduped.
    pub entries: Vec<FeedEntry>,
}
