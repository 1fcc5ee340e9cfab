use super::{normalize_feed, Feed, FeedError};
use crate::xml::{parse_document, ParseConfig};
use futures::StreamExt;

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Fetches a feed URL and normalizes the response into a [`Feed`].
///
/// Performs exactly one GET — no retries, no internal timeout (the client's
/// own transport defaults apply). The caller supplies the HTTP client and
/// thereby controls connection pooling, TLS, and timeout configuration.
/// Concurrent calls are independent; no state is shared between fetches.
///
/// The body is decoded as UTF-8. Feeds served in another encoding are not
/// transcoded: bytes that are invalid UTF-8 become replacement characters
/// instead of failing the fetch.
///
/// # Errors
///
/// - [`FeedError::Transport`] — DNS, connection, or TLS failure
/// - [`FeedError::HttpStatus`] — non-2xx response status
/// - [`FeedError::ResponseTooLarge`] — body exceeded the 10MB limit
/// - [`FeedError::Parse`] — body is not well-formed XML
/// - [`FeedError::InvalidFormat`] — XML is neither RSS nor Atom shaped
pub async fn fetch_feed(client: &reqwest::Client, url: &str) -> Result<Feed, FeedError> {
    tracing::debug!(url = %url, "fetching feed");

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::HttpStatus(status.as_u16()));
    }

    let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;
    let text = String::from_utf8_lossy(&bytes);

    let doc = parse_document(&text, &ParseConfig::default())?;
    let feed = normalize_feed(&doc)?;

    tracing::debug!(url = %url, entries = feed.entries.len(), "feed normalized");
    Ok(feed)
}

/// Reads the response body with a size limit using stream-based reading.
async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FeedError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FeedError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FeedError::Transport)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FeedError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
