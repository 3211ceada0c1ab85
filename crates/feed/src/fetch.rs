use crate::error::FeedError;
use crate::parse::{ParsedFeed, parse_locations};
use crate::record::LocationRecord;
use crate::records_or_empty;
use crate::spec::{FeedSpec, MAX_FEED_BYTES};

/// Fetch the feed once and parse it. No retries.
pub async fn fetch_locations(
    client: &reqwest::Client,
    spec: &FeedSpec,
) -> Result<ParsedFeed, FeedError> {
    let url = spec.checked_url()?;

    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| FeedError::Fetch(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FeedError::Status(status.as_u16()));
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| FeedError::Fetch(e.to_string()))?;

    if bytes.len() > MAX_FEED_BYTES {
        return Err(FeedError::TooLarge {
            len: bytes.len(),
            max: MAX_FEED_BYTES,
        });
    }

    let text = std::str::from_utf8(&bytes).map_err(|_| FeedError::NotUtf8)?;
    parse_locations(text, spec)
}

/// [`fetch_locations`] in degraded mode: any failure yields no records.
pub async fn load_locations(client: &reqwest::Client, spec: &FeedSpec) -> Vec<LocationRecord> {
    records_or_empty(&spec.url, fetch_locations(client, spec).await)
}
