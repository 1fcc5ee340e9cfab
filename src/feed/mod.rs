//! Feed fetching and normalization.
//!
//! This module is the core of the crate: it retrieves RSS 2.0 or Atom XML
//! over HTTP and maps both formats onto one canonical [`Feed`] shape.
//!
//! # Architecture
//!
//! The pipeline is a straight line with one suspension point (the network
//! request) and no shared mutable state:
//!
//! - [`fetch_feed`] — HTTP GET, status validation, size-limited body read
//! - [`crate::xml`] — raw XML text into a generic key-value tree
//! - [`normalize_feed`] — shape detection and ordered-candidate field mapping
//!
//! Per-field anomalies inside a recognizable feed never fail the fetch;
//! they are defaulted instead. Only the [`FeedError`] conditions abort.

mod fetcher;
mod model;
mod normalizer;

pub use fetcher::fetch_feed;
pub use model::{Categories, Feed, FeedEntry};
pub use normalizer::normalize_feed;

use crate::xml::XmlError;
use thiserror::Error;

/// Errors that can abort a feed fetch.
///
/// These are the only hard failures in the pipeline; anything below the
/// feed level (a missing title, an unparseable date) is silently defaulted
/// instead.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the size limit
    #[error("response too large")]
    ResponseTooLarge,
    /// Body could not be parsed as XML
    #[error("parse error: {0}")]
    Parse(#[from] XmlError),
    /// XML is well formed but is neither RSS nor Atom shaped
    #[error("invalid feed format: no RSS channel or Atom feed root")]
    InvalidFormat,
}
