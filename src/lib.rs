//! Fetches RSS 2.0 and Atom feeds and normalizes them into one canonical
//! in-memory shape.
//!
//! The two formats disagree structurally (`rss > channel > item` versus
//! `feed > entry`, `description` versus `subtitle`, links as text versus
//! links as `href` attributes), so this crate resolves every canonical
//! field through an ordered candidate list and defaults whatever a source
//! omits. Consumers get one [`Feed`] type no matter what the publisher
//! emitted.
//!
//! # Example
//!
//! ```no_run
//! # async fn run() -> Result<(), unifeed::FeedError> {
//! let client = reqwest::Client::new();
//! let feed = unifeed::fetch_feed(&client, "https://example.com/rss.xml").await?;
//!
//! for entry in &feed.entries {
//!     println!(
//!         "{} — {}",
//!         entry.title,
//!         unifeed::format_relative_date(&entry.published_at),
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Errors are the four [`FeedError`] kinds (plus a body-size guard); a
//! recognizable feed with missing fields never fails, it defaults. Display
//! helpers ([`format_absolute_date`], [`format_relative_date`],
//! [`strip_markup`]) are pure and synchronous.

pub mod feed;
pub mod util;
pub mod xml;

pub use feed::{fetch_feed, normalize_feed, Categories, Feed, FeedEntry, FeedError};
pub use util::{format_absolute_date, format_relative_date, strip_markup};
pub use xml::{parse_document, ParseConfig, XmlError, XmlValue};
